//! Geometry inspection command.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::engine::resolve;
use crate::models::{FramebufferGeometry, KeyboardGeometry, Rotation};
use clap::Args;
use serde::Serialize;

/// Resolve the keyboard geometry for a screen without opening devices
#[derive(Args, Debug)]
pub struct GeometryArgs {
    /// Framebuffer width in pixels
    #[arg(long)]
    width: u32,

    /// Framebuffer height in pixels
    #[arg(long)]
    height: u32,

    /// Bytes per scanline (defaults to width * bytes per pixel)
    #[arg(long)]
    stride: Option<u32>,

    /// Bits per pixel (8, 16, 24 or 32)
    #[arg(long, default_value_t = 32)]
    bpp: u32,

    /// Rotation: 0 none, 1 clockwise, 2 upside down, 3 counter-clockwise
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    rotation: u8,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// JSON-serializable geometry report
#[derive(Serialize, Debug)]
struct GeometryOutput {
    framebuffer: FramebufferGeometry,
    keyboard: KeyboardGeometry,
    keys_height: u32,
    composition_height: u32,
}

impl GeometryArgs {
    /// Execute geometry command
    pub fn execute(&self) -> CliResult<()> {
        if !matches!(self.bpp, 8 | 16 | 24 | 32) {
            return Err(CliError::validation(format!(
                "Unsupported bits per pixel: {} (expected 8, 16, 24 or 32)",
                self.bpp
            )));
        }
        let min_stride = u64::from(self.width) * u64::from(self.bpp.div_ceil(8));
        if u32::try_from(min_stride).is_err() {
            return Err(CliError::validation(format!(
                "Width {} is too large: one row needs {min_stride} bytes",
                self.width
            )));
        }
        let framebuffer = match self.stride {
            Some(stride) => FramebufferGeometry::new(self.width, self.height, stride, self.bpp),
            None => FramebufferGeometry::packed(self.width, self.height, self.bpp),
        };
        if u64::from(framebuffer.stride_bytes) < min_stride {
            return Err(CliError::validation(format!(
                "Stride {} is shorter than one row of pixels ({min_stride} bytes)",
                framebuffer.stride_bytes
            )));
        }

        let rotation = Rotation::from(self.rotation);
        let keyboard = resolve(&framebuffer, rotation)
            .map_err(|e| CliError::validation(format!("Cannot resolve geometry: {e}")))?;

        let output = GeometryOutput {
            framebuffer,
            keyboard,
            keys_height: keyboard.keys_height(),
            composition_height: keyboard.composition_height(),
        };
        if self.json {
            print_json(&output)
        } else {
            print_human_readable(&output);
            Ok(())
        }
    }
}

fn print_human_readable(output: &GeometryOutput) {
    let fb = &output.framebuffer;
    let kb = &output.keyboard;
    println!("Framebuffer");
    println!("===========");
    println!("  Size:        {}x{}", fb.width_px, fb.height_px);
    println!("  Stride:      {} bytes", fb.stride_bytes);
    println!("  Format:      {:?} ({} bpp)", fb.pixel_format(), fb.bits_per_pixel);
    println!();
    println!("Keyboard");
    println!("========");
    println!("  Rotation:    {}", kb.rotation);
    println!("  Landscape:   {}", kb.is_landscape);
    println!("  Width:       {}", kb.logical_width);
    println!("  Height:      {}", output.keys_height);
    println!("  Row height:  {}", kb.row_height_px);
    println!("  Buffer:      {:?}", kb.layout);
    println!(
        "  Buffer size: {} bytes ({} x {})",
        kb.composition_size_bytes, kb.composition_stride_bytes, output.composition_height
    );
    if kb.is_degenerate() {
        println!();
        println!("Warning: screen too small for key rows; touches will not register");
    }
}
