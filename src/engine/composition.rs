//! Composition buffers and the blitter.
//!
//! The renderer draws in keyboard coordinates: `x` runs along the
//! keyboard's logical width, `y` down through the divider and rows. Each
//! buffer variant owns the translation to its byte layout and knows how
//! to copy itself into the framebuffer.

use crate::device::FramebufferSink;
use crate::models::{
    Anchor, BufferLayout, FramebufferGeometry, KeyboardGeometry, PixelFormat, RgbColor, Rotation,
};

use super::error::{EngineError, EngineResult};

/// Off-screen keyboard image in one of the two byte layouts.
#[derive(Debug, Clone)]
pub enum CompositionBuffer {
    /// Scanline-compatible with the framebuffer (no or half rotation)
    NativeStride(NativeStrideBuffer),
    /// XRGB8888 in keyboard orientation (quarter rotations)
    TransposedRgba(TransposedRgbaBuffer),
}

/// Drawing surface in keyboard coordinates.
pub trait Canvas {
    /// Width along the keys of a row.
    fn width(&self) -> u32;

    /// Height including the divider scanline.
    fn height(&self) -> u32;

    /// Writes one pixel. Out-of-range coordinates are ignored.
    fn put_pixel(&mut self, x: u32, y: u32, color: RgbColor);

    /// Fills a rectangle, clipped to the canvas.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: RgbColor) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.put_pixel(px, py, color);
            }
        }
    }
}

impl CompositionBuffer {
    /// Allocates a zeroed buffer for `geometry`, placed at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Allocation` if the buffer cannot be reserved.
    pub fn allocate(
        geometry: &KeyboardGeometry,
        framebuffer: &FramebufferGeometry,
        anchor: Anchor,
    ) -> EngineResult<Self> {
        let bytes = zeroed(geometry.composition_size_bytes)?;
        let lines = geometry.composition_height();
        // First logical scanline of the band on the rotated screen.
        let band_top = match anchor {
            Anchor::Top => 0,
            Anchor::Bottom => geometry.logical_height.saturating_sub(lines),
        };

        Ok(match geometry.layout {
            BufferLayout::NativeStride => {
                let mirrored = geometry.rotation == Rotation::Half;
                let first_scanline = if mirrored {
                    framebuffer.height_px.saturating_sub(band_top + lines)
                } else {
                    band_top
                };
                Self::NativeStride(NativeStrideBuffer {
                    bytes,
                    stride: geometry.composition_stride_bytes as usize,
                    width: geometry.logical_width,
                    lines,
                    format: geometry.native_format,
                    mirrored,
                    first_scanline,
                    framebuffer: *framebuffer,
                })
            }
            BufferLayout::TransposedRgba => {
                let clockwise = geometry.rotation == Rotation::ClockwiseQuarter;
                let first_pixel = if clockwise {
                    framebuffer.width_px.saturating_sub(band_top + lines)
                } else {
                    band_top
                };
                Self::TransposedRgba(TransposedRgbaBuffer {
                    bytes,
                    width: geometry.logical_width,
                    lines,
                    clockwise,
                    first_pixel,
                    framebuffer: *framebuffer,
                })
            }
        })
    }

    /// Copies the whole buffer into the framebuffer.
    ///
    /// # Errors
    ///
    /// Propagates device write failures; they are fatal for the caller.
    pub fn blit(&self, sink: &mut dyn FramebufferSink) -> EngineResult<()> {
        match self {
            Self::NativeStride(buffer) => buffer.blit(sink),
            Self::TransposedRgba(buffer) => buffer.blit(sink),
        }
    }

    /// Resets every pixel to black.
    pub fn clear(&mut self) {
        match self {
            Self::NativeStride(buffer) => buffer.bytes.fill(0),
            Self::TransposedRgba(buffer) => buffer.bytes.fill(0),
        }
    }

    /// Raw composed bytes in this buffer's layout.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::NativeStride(buffer) => &buffer.bytes,
            Self::TransposedRgba(buffer) => &buffer.bytes,
        }
    }

    /// Byte layout of this buffer.
    pub const fn layout(&self) -> BufferLayout {
        match self {
            Self::NativeStride(_) => BufferLayout::NativeStride,
            Self::TransposedRgba(_) => BufferLayout::TransposedRgba,
        }
    }
}

impl Canvas for CompositionBuffer {
    fn width(&self) -> u32 {
        match self {
            Self::NativeStride(buffer) => buffer.width,
            Self::TransposedRgba(buffer) => buffer.width,
        }
    }

    fn height(&self) -> u32 {
        match self {
            Self::NativeStride(buffer) => buffer.lines,
            Self::TransposedRgba(buffer) => buffer.lines,
        }
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: RgbColor) {
        match self {
            Self::NativeStride(buffer) => buffer.put_pixel(x, y, color),
            Self::TransposedRgba(buffer) => buffer.put_pixel(x, y, color),
        }
    }
}

/// Buffer sharing the framebuffer's stride and pixel encoding.
///
/// Under `Rotation::Half` the image is stored upside down so that the
/// blit stays a straight scanline copy.
#[derive(Debug, Clone)]
pub struct NativeStrideBuffer {
    bytes: Vec<u8>,
    stride: usize,
    width: u32,
    lines: u32,
    format: PixelFormat,
    mirrored: bool,
    first_scanline: u32,
    framebuffer: FramebufferGeometry,
}

impl NativeStrideBuffer {
    /// Framebuffer scanline receiving composition line 0.
    pub const fn first_scanline(&self) -> u32 {
        self.first_scanline
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: RgbColor) {
        if x >= self.width || y >= self.lines {
            return;
        }
        let (bx, by) = if self.mirrored {
            (self.width - 1 - x, self.lines - 1 - y)
        } else {
            (x, y)
        };
        let bpp = self.format.bytes_per_pixel();
        let offset = by as usize * self.stride + bx as usize * bpp;
        if let Some(pixel) = self.bytes.get_mut(offset..offset + bpp) {
            self.format.encode(color, pixel);
        }
    }

    fn blit(&self, sink: &mut dyn FramebufferSink) -> EngineResult<()> {
        if self.stride == 0 {
            return Ok(());
        }
        let fb_stride = self.framebuffer.stride_bytes as usize;
        for (i, line) in self.bytes.chunks_exact(self.stride).enumerate() {
            let offset = (self.first_scanline as usize + i) * fb_stride;
            sink.write_at(offset, line)?;
        }
        Ok(())
    }
}

/// Buffer holding XRGB8888 pixels in keyboard orientation.
///
/// Keyboard column `c` lands on framebuffer scanline `c` (clockwise) or
/// `height - 1 - c` (counter-clockwise); each scanline receives one run
/// converted to the framebuffer's native encoding.
#[derive(Debug, Clone)]
pub struct TransposedRgbaBuffer {
    bytes: Vec<u8>,
    width: u32,
    lines: u32,
    clockwise: bool,
    first_pixel: u32,
    framebuffer: FramebufferGeometry,
}

impl TransposedRgbaBuffer {
    const BYTES_PER_PIXEL: usize = crate::constants::RGBA_BYTES_PER_PIXEL as usize;

    /// Framebuffer pixel column where each transposed run starts.
    pub const fn first_pixel(&self) -> u32 {
        self.first_pixel
    }

    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: RgbColor) {
        if x >= self.width || y >= self.lines {
            return;
        }
        let offset = self.pixel_offset(x, y);
        self.bytes[offset..offset + Self::BYTES_PER_PIXEL].copy_from_slice(&color.to_xrgb8888());
    }

    fn pixel(&self, x: u32, y: u32) -> RgbColor {
        let offset = self.pixel_offset(x, y);
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[offset..offset + Self::BYTES_PER_PIXEL]);
        RgbColor::from_xrgb8888(raw)
    }

    fn blit(&self, sink: &mut dyn FramebufferSink) -> EngineResult<()> {
        let format = self.framebuffer.pixel_format();
        let bpp = format.bytes_per_pixel();
        let fb_stride = self.framebuffer.stride_bytes as usize;
        let mut run = zeroed(self.lines as usize * bpp)?;

        for column in 0..self.width {
            let scanline = if self.clockwise {
                column
            } else {
                self.framebuffer.height_px.saturating_sub(column + 1)
            };
            for (k, out) in run.chunks_exact_mut(bpp).enumerate() {
                let k = k as u32;
                // Clockwise runs walk the band from its logical bottom up.
                let line = if self.clockwise { self.lines - 1 - k } else { k };
                format.encode(self.pixel(column, line), out);
            }
            let offset = scanline as usize * fb_stride + self.first_pixel as usize * bpp;
            sink.write_at(offset, &run)?;
        }
        Ok(())
    }
}

fn zeroed(len: usize) -> EngineResult<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { bytes: len })?;
    bytes.resize(len, 0);
    Ok(bytes)
}
