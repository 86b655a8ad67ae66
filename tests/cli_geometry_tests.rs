//! End-to-end tests for `fbkeys geometry`.

use std::process::Command;

mod fixtures;
use fixtures::*;

fn geometry(args: &[&str]) -> std::process::Output {
    Command::new(fbkeys_bin())
        .arg("geometry")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_geometry_json_portrait() {
    let output = geometry(&["--width", "480", "--height", "800", "--json"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "Should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    let keyboard = &result["keyboard"];
    assert_eq!(keyboard["is_landscape"], false);
    assert_eq!(keyboard["row_height_px"], 53);
    assert_eq!(keyboard["row_count"], 5);
    assert_eq!(keyboard["composition_stride_bytes"], 1920);
    assert_eq!(keyboard["composition_size_bytes"], 1920 * 266);
    assert_eq!(keyboard["layout"], "native_stride");
    assert_eq!(result["framebuffer"]["stride_bytes"], 1920);
}

#[test]
fn test_geometry_json_rotated() {
    let output = geometry(&["--width", "480", "--height", "800", "-r", "1", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let keyboard = &result["keyboard"];
    assert_eq!(keyboard["rotation"], 1);
    assert_eq!(keyboard["is_landscape"], true);
    assert_eq!(keyboard["row_height_px"], 48);
    assert_eq!(keyboard["logical_width"], 800);
    assert_eq!(keyboard["layout"], "transposed_rgba");
}

#[test]
fn test_geometry_human_readable() {
    let output = geometry(&["--width", "800", "--height", "480", "--bpp", "16"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Row height:  48"), "stdout: {stdout}");
    assert!(stdout.contains("Rgb565"));
}

#[test]
fn test_geometry_zero_width_fails() {
    let output = geometry(&["--width", "0", "--height", "800"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot resolve geometry"), "stderr: {stderr}");
}

#[test]
fn test_geometry_rejects_bad_rotation_and_depth() {
    let output = geometry(&["--width", "480", "--height", "800", "-r", "4"]);
    assert_ne!(output.status.code(), Some(0));

    let output = geometry(&["--width", "480", "--height", "800", "--bpp", "12"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_geometry_rejects_short_stride() {
    let output = geometry(&["--width", "480", "--height", "800", "--stride", "100"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_geometry_oversized_dimensions_fail_cleanly() {
    let output = geometry(&["--width", "1073741824", "--height", "10"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too large"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");

    let output = geometry(&["--width", "100", "--height", "1073741824", "-r", "1"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot resolve geometry"), "stderr: {stderr}");
    assert!(stderr.contains("too large"), "stderr: {stderr}");
}
