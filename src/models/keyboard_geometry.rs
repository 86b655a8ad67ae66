//! Keyboard geometry derived from the framebuffer and rotation.

use serde::{Deserialize, Serialize};

use super::{PixelFormat, Rotation};

/// Byte layout of the composition buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferLayout {
    /// Framebuffer stride and encoding; blitted scanline by scanline.
    NativeStride,
    /// Four bytes per pixel in keyboard orientation; transposed at blit time.
    TransposedRgba,
}

/// Keyboard band dimensions, computed once per rotation.
///
/// # Coordinate spaces
///
/// - Logical width: extent of the band along the keys of one row.
/// - Logical height: extent of the rotated screen across the rows, used
///   to place the band and to scale touch coordinates.
/// - Composition height: `row_height_px * row_count` plus the divider
///   scanline.
///
/// # Invariant
///
/// `composition_size_bytes == composition_stride_bytes * composition_height()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardGeometry {
    /// Rotation this geometry was resolved for
    pub rotation: Rotation,
    /// Whether the rotated screen is wider than it is tall
    pub is_landscape: bool,
    /// Keyboard width along its long axis, in pixels
    pub logical_width: u32,
    /// Rotated screen height, in pixels
    pub logical_height: u32,
    /// Height of one key row, in pixels (may be zero on tiny screens)
    pub row_height_px: u32,
    /// Number of key rows
    pub row_count: u32,
    /// Row height in 1/65536ths of the touch axis spanning `logical_height`
    pub touch_row_height_scaled: u32,
    /// Bytes per composition scanline
    pub composition_stride_bytes: u32,
    /// Total composition buffer size in bytes
    pub composition_size_bytes: usize,
    /// Composition buffer byte layout
    pub layout: BufferLayout,
    /// Encoding the framebuffer expects
    pub native_format: PixelFormat,
}

impl KeyboardGeometry {
    /// Height of the key rows, excluding the divider.
    #[must_use]
    pub const fn keys_height(&self) -> u32 {
        self.row_height_px * self.row_count
    }

    /// Scanlines in the composition buffer, including the divider.
    #[must_use]
    pub const fn composition_height(&self) -> u32 {
        self.keys_height() + crate::constants::DIVIDER_LINES
    }

    /// Whether any key can be hit at all.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.row_height_px == 0 || self.logical_width == 0
    }

    /// Bytes per pixel inside the composition buffer.
    #[must_use]
    pub const fn composition_bytes_per_pixel(&self) -> usize {
        match self.layout {
            BufferLayout::NativeStride => self.native_format.bytes_per_pixel(),
            BufferLayout::TransposedRgba => crate::constants::RGBA_BYTES_PER_PIXEL as usize,
        }
    }
}
