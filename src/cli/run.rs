//! Keyboard run command.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::constants::{FBCON_ROTATE_PATH, INPUT_DEVICE_DIR};
use crate::device::{
    EvdevTouchscreen, FramebufferSink, LinuxFramebuffer, RotationSource, SysfsRotation,
    TouchSource, UinputKeyboard,
};
use crate::engine::{CancelToken, Devices, Dispatcher, Font8x8Glyphs, Presentation};
use crate::models::{Anchor, KeyAction, Keymap, Rotation};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// Show the keyboard and type through a virtual input device
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Touch device node (auto-detected when omitted)
    #[arg(short = 'd', long = "device", value_name = "DEVICE")]
    device: Option<PathBuf>,

    /// Framebuffer device node
    #[arg(long, value_name = "PATH")]
    framebuffer: Option<PathBuf>,

    /// Rotation: 0 none, 1 clockwise, 2 upside down, 3 counter-clockwise
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=3))]
    rotation: Option<u8>,

    /// Screen edge the keyboard is attached to
    #[arg(long, value_enum)]
    anchor: Option<Anchor>,

    /// Re-layout when the console rotation changes
    #[arg(long)]
    follow_rotation: bool,
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Framebuffer device node
    pub framebuffer: PathBuf,
    /// Touch device node, when known up front
    pub touchscreen: Option<PathBuf>,
    /// Rotation fixed by flag or config
    pub rotation: Option<Rotation>,
    /// Screen edge
    pub anchor: Anchor,
    /// Poll the console rotation
    pub follow_rotation: bool,
}

impl RunArgs {
    /// Merges flags over `config`.
    #[must_use]
    pub fn settings(&self, config: &Config) -> RunSettings {
        RunSettings {
            framebuffer: self
                .framebuffer
                .clone()
                .unwrap_or_else(|| config.devices.framebuffer.clone()),
            touchscreen: self
                .device
                .clone()
                .or_else(|| config.devices.touchscreen.clone()),
            rotation: self
                .rotation
                .and_then(Rotation::from_index)
                .or_else(|| config.display.rotation()),
            anchor: self.anchor.unwrap_or(config.display.anchor),
            follow_rotation: self.follow_rotation || config.display.follow_rotation,
        }
    }

    /// Execute run command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;
        let settings = self.settings(&config);

        let mut framebuffer = LinuxFramebuffer::open(&settings.framebuffer)?;
        let mut touch = match &settings.touchscreen {
            Some(path) => EvdevTouchscreen::open(path)?,
            None => EvdevTouchscreen::discover(Path::new(INPUT_DEVICE_DIR))?,
        };

        let keymap = Keymap::us();
        let mut keys = UinputKeyboard::create(key_codes(&keymap))?;

        let mut console = SysfsRotation::new(FBCON_ROTATE_PATH);
        let rotation = settings
            .rotation
            .or_else(|| console.current())
            .unwrap_or_default();
        info!("Rotation {rotation}, keyboard at the {}", settings.anchor);

        let glyphs = Font8x8Glyphs;
        let presentation = Presentation {
            anchor: settings.anchor,
            theme: config.theme,
        };
        let mut dispatcher = Dispatcher::new(
            &keymap,
            &glyphs,
            presentation,
            &framebuffer.geometry(),
            touch.axis_ranges(),
            rotation,
        )
        .map_err(|e| CliError::validation(e.to_string()))?;

        let mut devices = Devices {
            framebuffer: &mut framebuffer,
            touch: &mut touch,
            keys: &mut keys,
            rotation: if settings.follow_rotation {
                Some(&mut console as &mut dyn RotationSource)
            } else {
                None
            },
        };
        let cancel = CancelToken::new();
        dispatcher
            .run(&mut devices, &cancel)
            .map_err(|e| CliError::io(e.to_string()))
    }
}

/// Every key code the keymap can emit, modifiers included.
fn key_codes(keymap: &Keymap) -> Vec<u16> {
    let mut codes: Vec<u16> = keymap
        .keys()
        .map(|(_, key)| match key.action {
            KeyAction::Emit(code) => code,
            KeyAction::Latch(modifier) => modifier.code(),
        })
        .collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}
