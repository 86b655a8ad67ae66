//! Composition buffer blits into an in-memory framebuffer.

mod fixtures;
use fixtures::*;

use fbkeys::device::FramebufferSink;
use fbkeys::engine::{
    resolve, Canvas, CompositionBuffer, Font8x8Glyphs, KeyboardState, Renderer, Theme,
};
use fbkeys::models::{Anchor, FramebufferGeometry, Keymap, RgbColor, Rotation};

fn rendered(
    framebuffer: &FramebufferGeometry,
    rotation: Rotation,
    anchor: Anchor,
) -> CompositionBuffer {
    let geometry = resolve(framebuffer, rotation).unwrap();
    let mut buffer = CompositionBuffer::allocate(&geometry, framebuffer, anchor).unwrap();
    let keymap = Keymap::us();
    let renderer = Renderer::new(geometry, anchor, &keymap, Theme::default(), &Font8x8Glyphs);
    renderer.draw(&mut buffer, &KeyboardState::default());
    buffer
}

#[test]
fn test_native_scanlines_round_trip() {
    // Padded stride: 480 pixels * 4 bytes + 64 bytes of padding.
    let framebuffer = FramebufferGeometry::new(480, 800, 1984, 32);
    for rotation in [Rotation::None, Rotation::Half] {
        for anchor in [Anchor::Top, Anchor::Bottom] {
            let buffer = rendered(&framebuffer, rotation, anchor);
            let CompositionBuffer::NativeStride(native) = &buffer else {
                panic!("expected a native buffer for {rotation}");
            };
            let mut fb = memory_framebuffer(framebuffer);
            buffer.blit(&mut fb).unwrap();

            let stride = 1984;
            for (i, line) in buffer.as_bytes().chunks_exact(stride).enumerate() {
                let offset = (native.first_scanline() as usize + i) * stride;
                assert_eq!(&fb.bytes()[offset..offset + stride], line, "{rotation} {anchor} line {i}");
            }
        }
    }
}

#[test]
fn test_native_blit_leaves_rest_of_screen_alone() {
    let framebuffer = portrait_framebuffer();
    let buffer = rendered(&framebuffer, Rotation::None, Anchor::Bottom);
    let mut fb = memory_framebuffer(framebuffer);
    buffer.blit(&mut fb).unwrap();

    // 266 composition lines at the bottom of an 800-line screen.
    assert!(fb.bytes()[..534 * 1920].iter().all(|&b| b == 0));
    assert!(fb.scanline(534).iter().any(|&b| b != 0));
    assert_eq!(fb.writes(), 266);
}

#[test]
fn test_half_rotation_puts_divider_on_screen_top_side() {
    let framebuffer = portrait_framebuffer();
    let buffer = rendered(&framebuffer, Rotation::Half, Anchor::Bottom);
    let mut fb = memory_framebuffer(framebuffer);
    buffer.blit(&mut fb).unwrap();

    // Upside down, the logical bottom band sits on physical lines 0..266
    // and its divider on the last of them.
    let divider = Theme::default().divider.to_xrgb8888();
    assert_eq!(&fb.scanline(265)[..4], &divider);
    assert!(fb.scanline(266).iter().all(|&b| b == 0));
}

#[test]
fn test_clockwise_transposition() {
    let framebuffer = FramebufferGeometry::packed(30, 40, 32);
    let geometry = resolve(&framebuffer, Rotation::ClockwiseQuarter).unwrap();
    assert_eq!(geometry.logical_width, 40);
    assert_eq!(geometry.row_height_px, 3);

    let mut buffer = CompositionBuffer::allocate(&geometry, &framebuffer, Anchor::Top).unwrap();
    let red = RgbColor::new(0xFF, 0, 0);
    buffer.put_pixel(5, 0, red);

    let mut fb = memory_framebuffer(framebuffer);
    buffer.blit(&mut fb).unwrap();

    // Logical (x, y) lands on physical (W - 1 - y, x).
    let offset = 5 * 30 * 4 + 29 * 4;
    assert_eq!(&fb.bytes()[offset..offset + 4], &red.to_xrgb8888());
    assert_eq!(fb.writes(), 40);
}

#[test]
fn test_counter_clockwise_transposition_to_rgb565() {
    let framebuffer = FramebufferGeometry::packed(30, 40, 16);
    let geometry = resolve(&framebuffer, Rotation::CounterClockwiseQuarter).unwrap();
    let mut buffer = CompositionBuffer::allocate(&geometry, &framebuffer, Anchor::Top).unwrap();
    let green = RgbColor::new(0, 0xFF, 0);
    buffer.put_pixel(0, 2, green);

    let mut fb = memory_framebuffer(framebuffer);
    buffer.blit(&mut fb).unwrap();

    // Logical (x, y) lands on physical (y, H - 1 - x).
    let offset = 39 * 30 * 2 + 2 * 2;
    assert_eq!(&fb.bytes()[offset..offset + 2], &green.to_rgb565().to_le_bytes());
}

#[test]
fn test_blit_into_smaller_framebuffer_fails() {
    let framebuffer = portrait_framebuffer();
    let buffer = rendered(&framebuffer, Rotation::None, Anchor::Bottom);
    let mut fb = memory_framebuffer(FramebufferGeometry::packed(480, 400, 32));
    assert_eq!(fb.geometry().height_px, 400);
    assert!(buffer.blit(&mut fb).is_err());
}
