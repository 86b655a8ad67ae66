//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::collections::VecDeque;

use fbkeys::device::{KeySink, MemoryFramebuffer, TouchEvent, TouchSource};
use fbkeys::engine::{CancelToken, EngineResult};
use fbkeys::models::{AxisRange, AxisRanges, FramebufferGeometry};

/// 480x800 portrait panel at 32 bpp.
pub fn portrait_framebuffer() -> FramebufferGeometry {
    FramebufferGeometry::packed(480, 800, 32)
}

/// Touch ranges matching a 480x800 panel pixel for pixel.
pub fn pixel_axes() -> AxisRanges {
    AxisRanges::new(AxisRange::new(0, 479), AxisRange::new(0, 799))
}

/// Typical 12-bit touch controller ranges.
pub fn controller_axes() -> AxisRanges {
    AxisRanges::new(AxisRange::new(0, 4095), AxisRange::new(0, 4095))
}

/// Events for one finger-down report at `(x, y)`.
pub fn press_at(x: i32, y: i32) -> Vec<TouchEvent> {
    vec![
        TouchEvent::X(x),
        TouchEvent::Y(y),
        TouchEvent::Contact(true),
        TouchEvent::Sync,
    ]
}

/// Events for one finger-up report.
pub fn release() -> Vec<TouchEvent> {
    vec![TouchEvent::Contact(false), TouchEvent::Sync]
}

/// Touch source replaying scripted batches, cancelling once drained.
pub struct ScriptedTouch {
    axes: AxisRanges,
    batches: VecDeque<Vec<TouchEvent>>,
    cancel: CancelToken,
}

impl ScriptedTouch {
    pub fn new(axes: AxisRanges, batches: Vec<Vec<TouchEvent>>, cancel: CancelToken) -> Self {
        Self {
            axes,
            batches: batches.into(),
            cancel,
        }
    }
}

impl TouchSource for ScriptedTouch {
    fn axis_ranges(&self) -> AxisRanges {
        self.axes
    }

    fn read_events(&mut self) -> EngineResult<Vec<TouchEvent>> {
        match self.batches.pop_front() {
            Some(batch) => Ok(batch),
            None => {
                self.cancel.cancel();
                Ok(Vec::new())
            }
        }
    }
}

/// Key sink recording every tap.
#[derive(Debug, Default)]
pub struct RecordingKeys {
    pub taps: Vec<(u16, Vec<u16>)>,
}

impl KeySink for RecordingKeys {
    fn tap(&mut self, code: u16, modifiers: &[u16]) -> EngineResult<()> {
        self.taps.push((code, modifiers.to_vec()));
        Ok(())
    }
}

/// Memory framebuffer for `geometry`.
pub fn memory_framebuffer(geometry: FramebufferGeometry) -> MemoryFramebuffer {
    MemoryFramebuffer::new(geometry)
}

/// Path to the fbkeys binary
pub fn fbkeys_bin() -> &'static str {
    env!("CARGO_BIN_EXE_fbkeys")
}
