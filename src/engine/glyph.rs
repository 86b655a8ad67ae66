//! Pre-rasterized key labels.
//!
//! The renderer only consumes coverage bitmaps; where they come from is
//! behind `GlyphSource`. The bundled source scales the `font8x8` bitmap
//! font by an integer factor.

use font8x8::UnicodeFonts;

/// Coverage bitmap for one key label, one byte per pixel (0 = empty,
/// 255 = fully covered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Coverage bytes, `stride * height` long
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per bitmap row
    pub stride: u32,
}

impl Glyph {
    /// Coverage at `(x, y)`; zero outside the bitmap.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data
            .get(y as usize * self.stride as usize + x as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// Supplies rasterized labels.
pub trait GlyphSource {
    /// Rasterizes `label` no taller than `max_height`. `None` when the
    /// label is empty or cannot fit.
    fn glyph(&self, label: &str, max_height: u32) -> Option<Glyph>;
}

/// Side of one `font8x8` cell in pixels.
const CELL: u32 = 8;

/// Bitmap font glyphs scaled by the largest integer factor that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Font8x8Glyphs;

impl Font8x8Glyphs {
    fn cell(c: char) -> [u8; 8] {
        font8x8::BASIC_FONTS
            .get(c)
            .or_else(|| font8x8::BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }
}

impl GlyphSource for Font8x8Glyphs {
    fn glyph(&self, label: &str, max_height: u32) -> Option<Glyph> {
        let chars: Vec<char> = label.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let scale = max_height / CELL;
        if scale == 0 {
            return None;
        }
        let width = CELL * scale * chars.len() as u32;
        let height = CELL * scale;
        let mut data = vec![0u8; width as usize * height as usize];

        for (index, &c) in chars.iter().enumerate() {
            let origin_x = index as u32 * CELL * scale;
            for (row, bits) in Self::cell(c).iter().enumerate() {
                for col in 0..CELL {
                    // LSB is the leftmost pixel.
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        let y = row as u32 * scale + dy;
                        let line = y as usize * width as usize;
                        let x = (origin_x + col * scale) as usize;
                        data[line + x..line + x + scale as usize].fill(255);
                    }
                }
            }
        }

        Some(Glyph {
            data,
            width,
            height,
            stride: width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_has_no_glyph() {
        assert_eq!(Font8x8Glyphs.glyph("", 64), None);
    }

    #[test]
    fn test_too_short_for_any_scale() {
        assert_eq!(Font8x8Glyphs.glyph("a", 7), None);
    }

    #[test]
    fn test_scaling_dimensions() {
        let glyph = Font8x8Glyphs.glyph("Tab", 26).unwrap();
        assert_eq!(glyph.height, 24);
        assert_eq!(glyph.width, 72);
        assert_eq!(glyph.data.len(), 72 * 24);
    }

    #[test]
    fn test_glyph_has_ink() {
        let glyph = Font8x8Glyphs.glyph("A", 8).unwrap();
        assert!(glyph.data.iter().any(|&c| c == 255));
        assert_eq!(glyph.coverage(100, 100), 0);
    }

    #[test]
    fn test_scaled_pixels_are_blocks() {
        let small = Font8x8Glyphs.glyph("W", 8).unwrap();
        let big = Font8x8Glyphs.glyph("W", 16).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let c = small.coverage(x, y);
                assert_eq!(big.coverage(2 * x, 2 * y), c);
                assert_eq!(big.coverage(2 * x + 1, 2 * y + 1), c);
            }
        }
    }
}
