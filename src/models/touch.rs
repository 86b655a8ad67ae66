//! Touch samples, axis ranges and hit results.

use serde::{Deserialize, Serialize};

/// Absolute axis range reported by the touch device (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Smallest value the axis reports
    pub min: i32,
    /// Largest value the axis reports
    pub max: i32,
}

impl AxisRange {
    /// Creates an axis range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of discrete positions the axis can report.
    ///
    /// Zero or negative for a degenerate range.
    #[must_use]
    pub const fn span(&self) -> i64 {
        self.max as i64 - self.min as i64 + 1
    }
}

/// Ranges of the two absolute axes, in the device's own orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRanges {
    /// Range of ABS_X
    pub x: AxisRange,
    /// Range of ABS_Y
    pub y: AxisRange,
}

impl AxisRanges {
    /// Creates axis ranges.
    #[must_use]
    pub const fn new(x: AxisRange, y: AxisRange) -> Self {
        Self { x, y }
    }
}

/// One completed touch position, in raw device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchSample {
    /// Raw X coordinate
    pub raw_x: i32,
    /// Raw Y coordinate
    pub raw_y: i32,
}

impl TouchSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(raw_x: i32, raw_y: i32) -> Self {
        Self { raw_x, raw_y }
    }
}

/// A touch that landed on the keyboard band.
///
/// `row` counts from the row nearest the logical top of the screen;
/// `column` is the pixel offset along the keyboard's logical width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyHit {
    /// Key row, `0..row_count`
    pub row: u32,
    /// Logical pixel column, `0..logical_width`
    pub column: u32,
}

impl KeyHit {
    /// Creates a hit.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}
