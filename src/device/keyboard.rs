//! Virtual keyboard over uinput.

use anyhow::{Context, Result};
use evdev::uinput::VirtualDevice;
use evdev::{AttributeSet, EventType, InputEvent, KeyCode};
use tracing::{debug, info};

use crate::constants::VIRTUAL_DEVICE_NAME;
use crate::engine::{EngineError, EngineResult};

use super::KeySink;

/// Key value for a press.
const PRESS: i32 = 1;
/// Key value for a release.
const RELEASE: i32 = 0;

/// Press and release batches for one tap: modifiers go down before the
/// key and come up after it, in reverse order.
pub fn tap_sequence(code: u16, modifiers: &[u16]) -> (Vec<(u16, i32)>, Vec<(u16, i32)>) {
    let press = modifiers
        .iter()
        .chain(std::iter::once(&code))
        .map(|&c| (c, PRESS))
        .collect();
    let release = std::iter::once(&code)
        .chain(modifiers.iter().rev())
        .map(|&c| (c, RELEASE))
        .collect();
    (press, release)
}

/// uinput device that types the keys of the on-screen keyboard.
pub struct UinputKeyboard {
    device: VirtualDevice,
}

impl UinputKeyboard {
    /// Creates the virtual device advertising `codes`.
    pub fn create(codes: impl IntoIterator<Item = u16>) -> Result<Self> {
        let mut keys = AttributeSet::<KeyCode>::new();
        let mut count = 0usize;
        for code in codes {
            keys.insert(KeyCode::new(code));
            count += 1;
        }
        let device = VirtualDevice::builder()
            .context("Failed to open /dev/uinput")?
            .name(VIRTUAL_DEVICE_NAME)
            .with_keys(&keys)
            .context("Failed to register key codes")?
            .build()
            .context("Failed to create virtual keyboard")?;
        info!("Created virtual keyboard '{VIRTUAL_DEVICE_NAME}' with {count} key codes");
        Ok(Self { device })
    }

    fn emit(&mut self, batch: &[(u16, i32)]) -> EngineResult<()> {
        let events: Vec<InputEvent> = batch
            .iter()
            .map(|&(code, value)| InputEvent::new(EventType::KEY.0, code, value))
            .collect();
        self.device
            .emit(&events)
            .map_err(|e| EngineError::device_io(VIRTUAL_DEVICE_NAME, "emit", e))
    }
}

impl KeySink for UinputKeyboard {
    fn tap(&mut self, code: u16, modifiers: &[u16]) -> EngineResult<()> {
        debug!("Key {code} with modifiers {modifiers:?}");
        let (press, release) = tap_sequence(code, modifiers);
        self.emit(&press)?;
        self.emit(&release)
    }
}
