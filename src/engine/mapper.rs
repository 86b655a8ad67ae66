//! Touch coordinate mapper.
//!
//! Raw samples are normalized per axis to a Q16.16 fraction of the
//! device range, reoriented into logical screen space for the active
//! rotation, and classified into a key row and a logical pixel column.
//!
//! Axis conventions: a device range `[min, max]` holds `max - min + 1`
//! positions, so the normalized fraction is half-open `[0, 1)` and both
//! ends of the range are valid samples. Rows own `[start, start + height)`.

use crate::models::{Anchor, AxisRange, AxisRanges, KeyHit, KeyboardGeometry, Rotation, TouchSample};

use super::error::{Axis, GeometryError};
use super::fixed::Q16;

/// Converts touch samples into key hits for one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchMapper {
    axes: AxisRanges,
    rotation: Rotation,
    logical_width: u32,
    row_count: u32,
    row_height: Q16,
    band_start: Q16,
    band_end: Q16,
}

impl TouchMapper {
    /// Builds a mapper for `geometry` with the keyboard placed at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateAxisRange` if either axis maximum
    /// is not above its minimum.
    pub fn new(
        axes: AxisRanges,
        geometry: &KeyboardGeometry,
        anchor: Anchor,
    ) -> Result<Self, GeometryError> {
        check_axis(Axis::X, axes.x)?;
        check_axis(Axis::Y, axes.y)?;

        let logical_height = u64::from(geometry.logical_height);
        let keys_height = u64::from(geometry.keys_height());
        let start_px = match anchor {
            Anchor::Top => 0,
            Anchor::Bottom => logical_height.saturating_sub(keys_height),
        };
        let band_start = Q16::ratio(start_px, logical_height).unwrap_or(Q16::ZERO);
        let band_end = Q16::ratio(start_px + keys_height, logical_height).unwrap_or(Q16::ZERO);

        Ok(Self {
            axes,
            rotation: geometry.rotation,
            logical_width: geometry.logical_width,
            row_count: geometry.row_count,
            row_height: Q16::from_bits(geometry.touch_row_height_scaled),
            band_start,
            band_end,
        })
    }

    /// Maps a raw sample to the key row and column under it.
    ///
    /// Returns `None` when the sample lies outside the device range, off
    /// the keyboard band, or the geometry has no usable rows.
    pub fn map(&self, sample: TouchSample) -> Option<KeyHit> {
        let fx = normalize(sample.raw_x, self.axes.x)?;
        let fy = normalize(sample.raw_y, self.axes.y)?;

        // (depth from logical top, distance from logical left)
        let (depth, along) = match self.rotation {
            Rotation::None => (fy, fx),
            Rotation::Half => (fy.mirror(), fx.mirror()),
            Rotation::ClockwiseQuarter => (fx.mirror(), fy),
            Rotation::CounterClockwiseQuarter => (fx, fy.mirror()),
        };

        if depth < self.band_start || depth >= self.band_end {
            return None;
        }
        let row = depth
            .saturating_sub(self.band_start)
            .div_floor(self.row_height)?
            // the truncated Q16 row height can push the band's last sliver
            // one row past the end
            .min(self.row_count.checked_sub(1)?);
        let column = along.scale(self.logical_width);
        if column >= self.logical_width {
            return None;
        }
        Some(KeyHit::new(row, column))
    }

    /// Rotation the mapper was built for.
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }
}

fn check_axis(axis: Axis, range: AxisRange) -> Result<(), GeometryError> {
    if range.max <= range.min {
        return Err(GeometryError::DegenerateAxisRange {
            axis,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

/// Position of `raw` within `range` as a fraction in `[0, 1)`.
fn normalize(raw: i32, range: AxisRange) -> Option<Q16> {
    if !range.contains(raw) {
        return None;
    }
    let offset = (i64::from(raw) - i64::from(range.min)) as u64;
    Q16::ratio(offset, range.span() as u64)
}
