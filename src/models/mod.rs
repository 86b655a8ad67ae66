//! Data models for framebuffer, keyboard and touch geometry.
//!
//! This module contains the plain value types passed between the device
//! layer and the engine. Models are independent of any device access.

pub mod framebuffer;
pub mod keyboard_geometry;
pub mod keymap;
pub mod rgb;
pub mod rotation;
pub mod touch;

// Re-export all model types
pub use framebuffer::{FramebufferGeometry, PixelFormat};
pub use keyboard_geometry::{BufferLayout, KeyboardGeometry};
pub use keymap::{Key, KeyAction, KeyId, Keymap, Modifier};
pub use rgb::RgbColor;
pub use rotation::{Anchor, Rotation};
pub use touch::{AxisRange, AxisRanges, KeyHit, TouchSample};
