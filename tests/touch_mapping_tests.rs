//! Touch coordinate mapper against resolved geometries.

mod fixtures;
use fixtures::*;

use fbkeys::engine::{resolve, GeometryError, TouchMapper};
use fbkeys::models::{Anchor, AxisRange, AxisRanges, KeyHit, Keymap, Rotation, TouchSample};

fn mapper(rotation: Rotation, anchor: Anchor, axes: AxisRanges) -> TouchMapper {
    let geometry = resolve(&portrait_framebuffer(), rotation).unwrap();
    TouchMapper::new(axes, &geometry, anchor).unwrap()
}

#[test]
fn test_axis_minimum_maps_to_row_zero() {
    let mapper = mapper(Rotation::None, Anchor::Top, controller_axes());
    assert_eq!(mapper.map(TouchSample::new(0, 0)), Some(KeyHit::new(0, 0)));
}

#[test]
fn test_axis_maximum_maps_to_last_row() {
    let mapper = mapper(Rotation::None, Anchor::Bottom, controller_axes());
    let hit = mapper.map(TouchSample::new(4095, 4095)).unwrap();
    assert_eq!(hit.row, 4);
    assert_eq!(hit.column, 479);
}

#[test]
fn test_out_of_range_samples_never_hit() {
    for rotation in Rotation::ALL {
        let mapper = mapper(rotation, Anchor::Bottom, controller_axes());
        for (x, y) in [(-1, 2000), (2000, -1), (4096, 2000), (2000, 4096), (i32::MIN, i32::MAX)] {
            assert_eq!(mapper.map(TouchSample::new(x, y)), None, "{rotation} ({x}, {y})");
        }
    }
}

#[test]
fn test_rows_stay_in_range_for_every_sample() {
    for rotation in Rotation::ALL {
        for anchor in [Anchor::Top, Anchor::Bottom] {
            let axes = AxisRanges::new(AxisRange::new(0, 255), AxisRange::new(0, 255));
            let mapper = mapper(rotation, anchor, axes);
            let geometry = resolve(&portrait_framebuffer(), rotation).unwrap();
            for x in 0..=255 {
                for y in (0..=255).step_by(3) {
                    if let Some(hit) = mapper.map(TouchSample::new(x, y)) {
                        assert!(hit.row < 5);
                        assert!(hit.column < geometry.logical_width);
                    }
                }
            }
        }
    }
}

#[test]
fn test_equal_axis_bounds_are_rejected() {
    let geometry = resolve(&portrait_framebuffer(), Rotation::None).unwrap();
    let axes = AxisRanges::new(AxisRange::new(0, 4095), AxisRange::new(7, 7));
    assert!(matches!(
        TouchMapper::new(axes, &geometry, Anchor::Bottom),
        Err(GeometryError::DegenerateAxisRange { .. })
    ));
}

#[test]
fn test_clockwise_screen_bottom_band_is_device_left_edge() {
    // Clockwise: the logical bottom of the screen is the panel's left edge.
    let mapper = mapper(Rotation::ClockwiseQuarter, Anchor::Bottom, pixel_axes());
    let hit = mapper.map(TouchSample::new(0, 0)).unwrap();
    assert_eq!(hit.row, 4);
    assert_eq!(hit.column, 0);
    assert_eq!(mapper.map(TouchSample::new(479, 0)), None);
}

#[test]
fn test_hits_resolve_to_keys() {
    let keymap = Keymap::us();
    let mapper = mapper(Rotation::None, Anchor::Top, pixel_axes());
    // Far left of the top row is Esc.
    let hit = mapper.map(TouchSample::new(2, 10)).unwrap();
    let id = keymap.key_at(hit, 480).unwrap();
    assert_eq!(keymap.key(id).unwrap().label, "Esc");
}
