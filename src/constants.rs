//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name, default device paths and the fixed
//! keyboard shape.

/// The display name of the application.
pub const APP_NAME: &str = "fbkeys";

/// Name of the virtual keyboard registered with uinput.
pub const VIRTUAL_DEVICE_NAME: &str = "fbkeys virtual keyboard";

/// Framebuffer opened when neither the CLI nor the config names one.
pub const DEFAULT_FRAMEBUFFER: &str = "/dev/fb0";

/// Directory scanned for touch devices when none is given.
pub const INPUT_DEVICE_DIR: &str = "/dev/input";

/// sysfs file holding the console rotation (0-3).
pub const FBCON_ROTATE_PATH: &str = "/sys/class/graphics/fbcon/rotate";

/// sysfs directory holding per-framebuffer attributes (`<dir>/fb0/stride`).
pub const FB_SYSFS_DIR: &str = "/sys/class/graphics";

/// Number of key rows. The keyboard grid is fixed.
pub const ROW_COUNT: u32 = 5;

/// Scanlines reserved for the divider between keyboard and screen.
pub const DIVIDER_LINES: u32 = 1;

/// Bytes per pixel of the intermediate buffer used by quarter rotations.
pub const RGBA_BYTES_PER_PIXEL: u32 = 4;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "FBKEYS_CONFIG_DIR";
