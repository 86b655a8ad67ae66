//! Screen geometry resolver.
//!
//! Maps framebuffer dimensions and a rotation to the keyboard band
//! geometry. Two regimes exist:
//!
//! - `None`/`Half` keep the framebuffer's scanline mapping, so the
//!   composition buffer reuses the native stride and encoding and is
//!   blitted with plain scanline copies.
//! - Quarter rotations swap the axes; the composition buffer is kept in
//!   keyboard orientation at four bytes per pixel and transposed during
//!   the blit.

use tracing::debug;

use crate::constants::{DIVIDER_LINES, RGBA_BYTES_PER_PIXEL, ROW_COUNT};
use crate::models::{BufferLayout, FramebufferGeometry, KeyboardGeometry, Rotation};

use super::error::GeometryError;
use super::fixed::Q16;

/// Divisor applied to the short logical dimension in portrait screens.
const PORTRAIT_BAND_DIVISOR: u32 = 3;

/// Divisor applied to the short logical dimension in landscape screens.
const LANDSCAPE_BAND_DIVISOR: u32 = 2;

/// Resolves the keyboard geometry for `framebuffer` under `rotation`.
///
/// A row height of zero is accepted: the geometry is valid but no touch
/// will ever hit a key.
///
/// # Errors
///
/// Returns `GeometryError::DegenerateDimensions` if width or height is zero,
/// and `GeometryError::Oversized` if the composition buffer size overflows.
pub fn resolve(
    framebuffer: &FramebufferGeometry,
    rotation: Rotation,
) -> Result<KeyboardGeometry, GeometryError> {
    let width = framebuffer.width_px;
    let height = framebuffer.height_px;
    if width == 0 || height == 0 {
        return Err(GeometryError::DegenerateDimensions { width, height });
    }

    // Logical dimensions after rotation.
    let (logical_width, logical_height) = if rotation.is_quarter() {
        (height, width)
    } else {
        (width, height)
    };

    let is_landscape = logical_height < logical_width;
    let band_divisor = if is_landscape {
        LANDSCAPE_BAND_DIVISOR
    } else {
        PORTRAIT_BAND_DIVISOR
    };
    let row_height_px = logical_height / band_divisor / ROW_COUNT;
    let composition_lines = row_height_px * ROW_COUNT + DIVIDER_LINES;

    let oversized = GeometryError::Oversized { width, height };
    let (layout, composition_stride_bytes) = if rotation.is_quarter() {
        let stride = logical_width
            .checked_mul(RGBA_BYTES_PER_PIXEL)
            .ok_or(oversized)?;
        (BufferLayout::TransposedRgba, stride)
    } else {
        (BufferLayout::NativeStride, framebuffer.stride_bytes)
    };
    let composition_size_bytes = (composition_stride_bytes as usize)
        .checked_mul(composition_lines as usize)
        .ok_or(oversized)?;

    let touch_row_height_scaled =
        Q16::ratio(u64::from(row_height_px), u64::from(logical_height))
            .unwrap_or(Q16::ZERO)
            .to_bits();

    let geometry = KeyboardGeometry {
        rotation,
        is_landscape,
        logical_width,
        logical_height,
        row_height_px,
        row_count: ROW_COUNT,
        touch_row_height_scaled,
        composition_stride_bytes,
        composition_size_bytes,
        layout,
        native_format: framebuffer.pixel_format(),
    };

    debug!("framebuffer width:       {}", width);
    debug!("framebuffer height:      {}", height);
    debug!("framebuffer line length: {}", framebuffer.stride_bytes);
    debug!("keyboard width:          {}", logical_width);
    debug!("keyboard height:         {}", geometry.keys_height());
    debug!("keyboard row height:     {}", row_height_px);
    debug!(
        ?layout,
        rotation = %rotation,
        composition_bytes = composition_size_bytes,
        "resolved keyboard geometry"
    );

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait() -> FramebufferGeometry {
        FramebufferGeometry::packed(480, 800, 32)
    }

    #[test]
    fn test_portrait_no_rotation() {
        let geometry = resolve(&portrait(), Rotation::None).unwrap();
        assert!(!geometry.is_landscape);
        assert_eq!(geometry.row_height_px, 53);
        assert_eq!(geometry.logical_width, 480);
        assert_eq!(geometry.composition_stride_bytes, 1920);
        assert_eq!(geometry.composition_size_bytes, 1920 * (53 * 5 + 1));
        assert_eq!(geometry.layout, BufferLayout::NativeStride);
        assert_eq!(geometry.touch_row_height_scaled, 53 * 65536 / 800);
    }

    #[test]
    fn test_portrait_clockwise() {
        let geometry = resolve(&portrait(), Rotation::ClockwiseQuarter).unwrap();
        assert!(geometry.is_landscape);
        assert_eq!(geometry.row_height_px, 48);
        assert_eq!(geometry.logical_width, 800);
        assert_eq!(geometry.logical_height, 480);
        assert_eq!(geometry.composition_stride_bytes, 800 * 4);
        assert_eq!(geometry.composition_size_bytes, 800 * 4 * (48 * 5 + 1));
        assert_eq!(geometry.layout, BufferLayout::TransposedRgba);
    }

    #[test]
    fn test_landscape_half() {
        let framebuffer = FramebufferGeometry::packed(800, 480, 16);
        let geometry = resolve(&framebuffer, Rotation::Half).unwrap();
        assert!(geometry.is_landscape);
        assert_eq!(geometry.row_height_px, 48);
        assert_eq!(geometry.composition_stride_bytes, 1600);
    }

    #[test]
    fn test_padded_stride_is_reused() {
        let framebuffer = FramebufferGeometry::new(480, 800, 2048, 32);
        let geometry = resolve(&framebuffer, Rotation::None).unwrap();
        assert_eq!(geometry.composition_stride_bytes, 2048);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let framebuffer = FramebufferGeometry::packed(0, 800, 32);
        assert_eq!(
            resolve(&framebuffer, Rotation::None),
            Err(GeometryError::DegenerateDimensions {
                width: 0,
                height: 800
            })
        );
    }

    #[test]
    fn test_quarter_stride_overflow_rejected() {
        let framebuffer = FramebufferGeometry::new(100, 1 << 30, 400, 32);
        assert_eq!(
            resolve(&framebuffer, Rotation::ClockwiseQuarter),
            Err(GeometryError::Oversized {
                width: 100,
                height: 1 << 30
            })
        );
        // Unrotated, the same screen keeps its native stride.
        assert!(resolve(&framebuffer, Rotation::None).is_ok());
    }

    #[test]
    fn test_tiny_screen_has_zero_row_height() {
        let framebuffer = FramebufferGeometry::packed(8, 8, 8);
        let geometry = resolve(&framebuffer, Rotation::None).unwrap();
        assert_eq!(geometry.row_height_px, 0);
        assert!(geometry.is_degenerate());
        assert_eq!(geometry.composition_size_bytes, 8);
    }
}
