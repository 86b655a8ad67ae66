//! Keyboard engine: geometry, touch mapping, composition and dispatch.
//!
//! Nothing in here opens a device. Hardware is reached through the traits
//! in `crate::device`, which keeps the engine testable against in-memory
//! stand-ins.

pub mod composition;
pub mod dispatch;
pub mod error;
pub mod fixed;
pub mod glyph;
pub mod mapper;
pub mod render;
pub mod resolver;

pub use composition::{Canvas, CompositionBuffer};
pub use dispatch::{CancelToken, Devices, Dispatcher, Presentation, SampleAccumulator, TouchFrame};
pub use error::{Axis, EngineError, EngineResult, GeometryError};
pub use fixed::Q16;
pub use glyph::{Font8x8Glyphs, Glyph, GlyphSource};
pub use mapper::TouchMapper;
pub use render::{KeyboardState, Renderer, Theme};
pub use resolver::resolve;
