//! Screen rotation and keyboard placement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotation of the logical screen relative to the framebuffer.
///
/// Values follow the fbcon convention: 0 = none, 1 = 90° clockwise,
/// 2 = upside down, 3 = 90° counter-clockwise. Arithmetic is modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum Rotation {
    /// Framebuffer orientation
    #[default]
    None,
    /// Rotated 90° clockwise
    ClockwiseQuarter,
    /// Rotated 180°
    Half,
    /// Rotated 90° counter-clockwise
    CounterClockwiseQuarter,
}

impl Rotation {
    /// All rotations in step order.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::ClockwiseQuarter,
        Self::Half,
        Self::CounterClockwiseQuarter,
    ];

    /// Builds a rotation from any step count, taken modulo 4.
    #[must_use]
    pub const fn from_steps(steps: u32) -> Self {
        match steps % 4 {
            0 => Self::None,
            1 => Self::ClockwiseQuarter,
            2 => Self::Half,
            _ => Self::CounterClockwiseQuarter,
        }
    }

    /// Step index 0-3.
    #[must_use]
    pub const fn steps(self) -> u32 {
        match self {
            Self::None => 0,
            Self::ClockwiseQuarter => 1,
            Self::Half => 2,
            Self::CounterClockwiseQuarter => 3,
        }
    }

    /// Rotates further by `steps` quarter turns clockwise.
    #[must_use]
    pub const fn rotated(self, steps: u32) -> Self {
        Self::from_steps(self.steps() + steps % 4)
    }

    /// True when logical width and height are swapped against the framebuffer.
    #[must_use]
    pub const fn is_quarter(self) -> bool {
        matches!(self, Self::ClockwiseQuarter | Self::CounterClockwiseQuarter)
    }

    /// Parses the strict 0-3 form used by sysfs and the config file.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 4 {
            Some(Self::from_steps(index as u32))
        } else {
            None
        }
    }
}

impl From<u8> for Rotation {
    fn from(value: u8) -> Self {
        Self::from_steps(u32::from(value))
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.steps() as u8
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::ClockwiseQuarter => write!(f, "clockwise"),
            Self::Half => write!(f, "upside-down"),
            Self::CounterClockwiseQuarter => write!(f, "counter-clockwise"),
        }
    }
}

/// Edge of the logical screen the keyboard band is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Keyboard along the logical top edge; divider below it
    Top,
    /// Keyboard along the logical bottom edge; divider above it
    #[default]
    Bottom,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}
