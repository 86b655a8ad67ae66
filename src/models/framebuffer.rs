//! Framebuffer geometry as reported by the display driver.

use serde::{Deserialize, Serialize};

use super::RgbColor;

/// Static framebuffer dimensions, queried once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferGeometry {
    /// Visible width in pixels
    pub width_px: u32,
    /// Visible height in pixels
    pub height_px: u32,
    /// Bytes from the start of one scanline to the next
    pub stride_bytes: u32,
    /// Bits per pixel of the native encoding
    pub bits_per_pixel: u32,
}

impl FramebufferGeometry {
    /// Creates a geometry with an explicit stride.
    #[must_use]
    pub const fn new(width_px: u32, height_px: u32, stride_bytes: u32, bits_per_pixel: u32) -> Self {
        Self {
            width_px,
            height_px,
            stride_bytes,
            bits_per_pixel,
        }
    }

    /// Creates a geometry with an unpadded stride.
    ///
    /// The stride saturates at `u32::MAX` for widths no scanline can hold.
    #[must_use]
    pub const fn packed(width_px: u32, height_px: u32, bits_per_pixel: u32) -> Self {
        Self::new(
            width_px,
            height_px,
            width_px.saturating_mul(bits_per_pixel.div_ceil(8)),
            bits_per_pixel,
        )
    }

    /// Native pixel encoding.
    #[must_use]
    pub const fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_bits_per_pixel(self.bits_per_pixel)
    }

    /// Total bytes covered by the visible scanlines.
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        self.stride_bytes as usize * self.height_px as usize
    }
}

/// Pixel encodings the blitter knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One byte per pixel, driven as a grey level
    Gray8,
    /// Two bytes per pixel, RGB565 little endian
    Rgb565,
    /// Three bytes per pixel, B G R
    Bgr888,
    /// Four bytes per pixel, B G R X
    Xrgb8888,
}

impl PixelFormat {
    /// Picks the encoding for a bit depth. Unknown depths round to the
    /// nearest supported byte width.
    #[must_use]
    pub const fn from_bits_per_pixel(bits_per_pixel: u32) -> Self {
        match bits_per_pixel {
            0..=8 => Self::Gray8,
            9..=16 => Self::Rgb565,
            17..=24 => Self::Bgr888,
            _ => Self::Xrgb8888,
        }
    }

    /// Bytes occupied by one pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb565 => 2,
            Self::Bgr888 => 3,
            Self::Xrgb8888 => 4,
        }
    }

    /// Writes `color` into `out`, which must be exactly one pixel wide.
    pub fn encode(self, color: RgbColor, out: &mut [u8]) {
        match self {
            Self::Gray8 => out[0] = color.luma(),
            Self::Rgb565 => out.copy_from_slice(&color.to_rgb565().to_le_bytes()),
            Self::Bgr888 => out.copy_from_slice(&[color.b, color.g, color.r]),
            Self::Xrgb8888 => out.copy_from_slice(&color.to_xrgb8888()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_stride() {
        assert_eq!(FramebufferGeometry::packed(480, 800, 32).stride_bytes, 1920);
        assert_eq!(FramebufferGeometry::packed(480, 800, 16).stride_bytes, 960);
        assert_eq!(FramebufferGeometry::packed(480, 800, 8).stride_bytes, 480);
        assert_eq!(FramebufferGeometry::packed(1 << 30, 10, 32).stride_bytes, u32::MAX);
    }

    #[test]
    fn test_pixel_format_from_depth() {
        assert_eq!(PixelFormat::from_bits_per_pixel(8), PixelFormat::Gray8);
        assert_eq!(PixelFormat::from_bits_per_pixel(16), PixelFormat::Rgb565);
        assert_eq!(PixelFormat::from_bits_per_pixel(24), PixelFormat::Bgr888);
        assert_eq!(PixelFormat::from_bits_per_pixel(32), PixelFormat::Xrgb8888);
    }

    #[test]
    fn test_encode_each_format() {
        let color = RgbColor::new(0xFF, 0x00, 0x80);

        let mut gray = [0u8; 1];
        PixelFormat::Gray8.encode(color, &mut gray);
        assert_eq!(gray[0], color.luma());

        let mut rgb565 = [0u8; 2];
        PixelFormat::Rgb565.encode(color, &mut rgb565);
        assert_eq!(u16::from_le_bytes(rgb565), color.to_rgb565());

        let mut bgr = [0u8; 3];
        PixelFormat::Bgr888.encode(color, &mut bgr);
        assert_eq!(bgr, [0x80, 0x00, 0xFF]);

        let mut xrgb = [0u8; 4];
        PixelFormat::Xrgb8888.encode(color, &mut xrgb);
        assert_eq!(xrgb, [0x80, 0x00, 0xFF, 0xFF]);
    }
}
