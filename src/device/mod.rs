//! Device boundaries.
//!
//! The engine talks to hardware only through the traits defined here.
//! Linux implementations live in the submodules; `MemoryFramebuffer`
//! stands in for the display in tests and dry runs.

pub mod framebuffer;
pub mod keyboard;
pub mod memory;
pub mod rotation;
pub mod touch;

pub use framebuffer::LinuxFramebuffer;
pub use keyboard::UinputKeyboard;
pub use memory::MemoryFramebuffer;
pub use rotation::{FixedRotation, SysfsRotation};
pub use touch::EvdevTouchscreen;

use crate::engine::EngineResult;
use crate::models::{AxisRanges, FramebufferGeometry, Rotation};

/// Write access to the display, positioned by byte offset.
pub trait FramebufferSink {
    /// Geometry reported by the driver.
    fn geometry(&self) -> FramebufferGeometry;

    /// Writes `bytes` starting at byte `offset`.
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> EngineResult<()>;
}

/// One decoded input event from the touch device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// Absolute X position update
    X(i32),
    /// Absolute Y position update
    Y(i32),
    /// Finger down (`true`) or lifted (`false`)
    Contact(bool),
    /// End of a report; the pending state forms one sample
    Sync,
}

/// Stream of absolute touch events.
pub trait TouchSource {
    /// Axis ranges, queried once when the device was opened.
    fn axis_ranges(&self) -> AxisRanges;

    /// Blocks until at least one event is available.
    fn read_events(&mut self) -> EngineResult<Vec<TouchEvent>>;
}

/// Destination for emitted key strokes.
pub trait KeySink {
    /// Presses and releases `code` while holding the `modifiers` codes.
    fn tap(&mut self, code: u16, modifiers: &[u16]) -> EngineResult<()>;
}

/// Reports the current screen rotation.
pub trait RotationSource {
    /// Current rotation, or `None` if it cannot be determined right now.
    fn current(&mut self) -> Option<Rotation>;
}
