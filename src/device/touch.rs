//! evdev touchscreen.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use evdev::{Device, EventType};
use tracing::{debug, info};

use crate::engine::{EngineError, EngineResult};
use crate::models::{AxisRange, AxisRanges};

use super::{TouchEvent, TouchSource};

/// Raw event codes from `linux/input-event-codes.h`.
mod codes {
    pub const SYN_REPORT: u16 = 0x00;
    pub const ABS_X: u16 = 0x00;
    pub const ABS_Y: u16 = 0x01;
    pub const ABS_MT_POSITION_X: u16 = 0x35;
    pub const ABS_MT_POSITION_Y: u16 = 0x36;
    pub const ABS_MT_TRACKING_ID: u16 = 0x39;
    pub const BTN_TOUCH: u16 = 0x14a;
}

/// Event codes the X and Y positions are read from.
///
/// Samples are only taken from the codes whose ranges were queried, so a
/// panel reporting both single-touch and multi-touch positions with
/// different ranges is normalized consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionCodes {
    /// Code carrying X
    pub x: u16,
    /// Code carrying Y
    pub y: u16,
}

impl PositionCodes {
    /// `ABS_X`/`ABS_Y`.
    pub const SINGLE_TOUCH: Self = Self {
        x: codes::ABS_X,
        y: codes::ABS_Y,
    };

    /// `ABS_MT_POSITION_X`/`ABS_MT_POSITION_Y`.
    pub const MULTI_TOUCH: Self = Self {
        x: codes::ABS_MT_POSITION_X,
        y: codes::ABS_MT_POSITION_Y,
    };
}

/// Converts one raw input event into a `TouchEvent`, if it is relevant.
pub fn decode(
    event_type: EventType,
    code: u16,
    value: i32,
    positions: PositionCodes,
) -> Option<TouchEvent> {
    if event_type == EventType::ABSOLUTE {
        if code == positions.x {
            Some(TouchEvent::X(value))
        } else if code == positions.y {
            Some(TouchEvent::Y(value))
        } else if code == codes::ABS_MT_TRACKING_ID {
            Some(TouchEvent::Contact(value >= 0))
        } else {
            None
        }
    } else if event_type == EventType::KEY && code == codes::BTN_TOUCH {
        Some(TouchEvent::Contact(value != 0))
    } else if event_type == EventType::SYNCHRONIZATION && code == codes::SYN_REPORT {
        Some(TouchEvent::Sync)
    } else {
        None
    }
}

/// Picks the single-touch axis when it has a usable range, else the
/// multi-touch one. Returns the chosen code and its range.
fn choose_axis(single: (u16, AxisRange), multi: (u16, AxisRange)) -> (u16, AxisRange) {
    if single.1.max > single.1.min {
        single
    } else {
        multi
    }
}

/// Touchscreen opened through evdev.
pub struct EvdevTouchscreen {
    device: Device,
    path: PathBuf,
    axes: AxisRanges,
    positions: PositionCodes,
}

impl EvdevTouchscreen {
    /// Opens `path` and reads its X/Y axis ranges.
    pub fn open(path: &Path) -> Result<Self> {
        let device = Device::open(path)
            .with_context(|| format!("Failed to open touch device {}", path.display()))?;
        let (axes, positions) = Self::read_axes(&device)
            .with_context(|| format!("Failed to query axis ranges of {}", path.display()))?;
        debug!(?positions, "position codes");
        info!(
            "Touch device {} ({}) x={}..{} y={}..{}",
            path.display(),
            device.name().unwrap_or("unnamed"),
            axes.x.min,
            axes.x.max,
            axes.y.min,
            axes.y.max
        );
        Ok(Self {
            device,
            path: path.to_path_buf(),
            axes,
            positions,
        })
    }

    /// Opens the first device under `dir` that reports absolute X/Y.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = list_event_nodes(dir)?;
        for path in &candidates {
            let Ok(device) = Device::open(path) else {
                debug!("Skipping {}: cannot open", path.display());
                continue;
            };
            if !is_touchscreen(&device) {
                debug!("Skipping {}: no absolute axes", path.display());
                continue;
            }
            drop(device);
            return Self::open(path);
        }
        Err(anyhow!(
            "No touchscreen found among {} device(s) in {}",
            candidates.len(),
            dir.display()
        ))
    }

    /// Device node this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_axes(device: &Device) -> Result<(AxisRanges, PositionCodes)> {
        let state = device.get_abs_state()?;
        let axis = |code: u16| {
            let info = &state[usize::from(code)];
            (code, AxisRange::new(info.minimum, info.maximum))
        };
        // Multi-touch only panels leave the single-touch axes empty.
        let (x_code, x) = choose_axis(axis(codes::ABS_X), axis(codes::ABS_MT_POSITION_X));
        let (y_code, y) = choose_axis(axis(codes::ABS_Y), axis(codes::ABS_MT_POSITION_Y));
        Ok((
            AxisRanges { x, y },
            PositionCodes {
                x: x_code,
                y: y_code,
            },
        ))
    }
}

impl TouchSource for EvdevTouchscreen {
    fn axis_ranges(&self) -> AxisRanges {
        self.axes
    }

    fn read_events(&mut self) -> EngineResult<Vec<TouchEvent>> {
        let events = self
            .device
            .fetch_events()
            .map_err(|e| EngineError::device_io(self.path.display().to_string(), "read", e))?;
        Ok(events
            .filter_map(|ev| decode(ev.event_type(), ev.code(), ev.value(), self.positions))
            .collect())
    }
}

/// Summary of one input device, as listed by `fbkeys devices`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InputDeviceInfo {
    /// Device node
    pub path: PathBuf,
    /// Name reported by the driver
    pub name: String,
    /// Whether it reports absolute X/Y
    pub touchscreen: bool,
    /// Axis ranges of a touchscreen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<AxisRanges>,
}

/// Lists `eventN` nodes in `dir`, sorted by number.
pub fn list_event_nodes(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut nodes: Vec<(u32, PathBuf)> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = name.to_str()?.strip_prefix("event")?.parse().ok()?;
            Some((index, entry.path()))
        })
        .collect();
    nodes.sort_by_key(|(index, _)| *index);
    Ok(nodes.into_iter().map(|(_, path)| path).collect())
}

/// Describes every readable input device in `dir`.
pub fn describe_devices(dir: &Path) -> Result<Vec<InputDeviceInfo>> {
    Ok(list_event_nodes(dir)?
        .into_iter()
        .filter_map(|path| {
            let device = Device::open(&path).ok()?;
            let touchscreen = is_touchscreen(&device);
            let axes = if touchscreen {
                EvdevTouchscreen::read_axes(&device).ok().map(|(axes, _)| axes)
            } else {
                None
            };
            Some(InputDeviceInfo {
                name: device.name().unwrap_or("unnamed").to_string(),
                touchscreen,
                axes,
                path,
            })
        })
        .collect())
}

fn is_touchscreen(device: &Device) -> bool {
    device.supported_events().contains(EventType::ABSOLUTE)
        && device.supported_absolute_axes().is_some_and(|axes| {
            axes.iter()
                .any(|axis| axis.0 == codes::ABS_X || axis.0 == codes::ABS_MT_POSITION_X)
        })
}
