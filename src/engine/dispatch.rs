//! Event loop.
//!
//! Touch events are folded into complete frames at each synchronization
//! report. A frame with contact highlights the key under the finger;
//! lifting the finger activates the highlighted key. Every visual change
//! is drawn into the composition buffer and blitted in one pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::device::{FramebufferSink, KeySink, RotationSource, TouchEvent, TouchSource};
use crate::models::{
    Anchor, AxisRanges, FramebufferGeometry, KeyAction, KeyId, KeyboardGeometry, Keymap, Rotation,
    TouchSample,
};

use super::composition::CompositionBuffer;
use super::error::EngineResult;
use super::glyph::GlyphSource;
use super::mapper::TouchMapper;
use super::render::{KeyboardState, Renderer, Theme};
use super::resolver::resolve;

/// Shared stop flag, checked once per loop iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop after the current iteration.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Touch state at one synchronization report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchFrame {
    /// Last known position, once both axes have reported
    pub sample: Option<TouchSample>,
    /// Whether a finger is down
    pub contact: bool,
}

/// Folds axis and contact updates into frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleAccumulator {
    x: Option<i32>,
    y: Option<i32>,
    contact: bool,
}

impl SampleAccumulator {
    /// Applies one event; returns a frame when `event` is a sync report.
    pub fn feed(&mut self, event: TouchEvent) -> Option<TouchFrame> {
        match event {
            TouchEvent::X(x) => self.x = Some(x),
            TouchEvent::Y(y) => self.y = Some(y),
            TouchEvent::Contact(down) => self.contact = down,
            TouchEvent::Sync => {
                let sample = self.x.zip(self.y).map(|(x, y)| TouchSample::new(x, y));
                return Some(TouchFrame {
                    sample,
                    contact: self.contact,
                });
            }
        }
        None
    }
}

/// Devices the loop reads from and writes to.
pub struct Devices<'a> {
    /// Display
    pub framebuffer: &'a mut dyn FramebufferSink,
    /// Touch input
    pub touch: &'a mut dyn TouchSource,
    /// Key output
    pub keys: &'a mut dyn KeySink,
    /// Polled every iteration when present
    pub rotation: Option<&'a mut dyn RotationSource>,
}

/// Presentation settings fixed for the lifetime of a dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Presentation {
    /// Side of the screen the keyboard occupies
    pub anchor: Anchor,
    /// Colors
    pub theme: Theme,
}

/// Keyboard state machine plus its render target.
pub struct Dispatcher<'a> {
    keymap: &'a Keymap,
    glyphs: &'a dyn GlyphSource,
    presentation: Presentation,
    axes: AxisRanges,
    geometry: KeyboardGeometry,
    mapper: TouchMapper,
    buffer: CompositionBuffer,
    state: KeyboardState,
    accumulator: SampleAccumulator,
}

impl<'a> Dispatcher<'a> {
    /// Resolves geometry for `rotation` and allocates the composition buffer.
    ///
    /// # Errors
    ///
    /// Fails on degenerate framebuffer dimensions or axis ranges, or when
    /// the buffer cannot be allocated.
    pub fn new(
        keymap: &'a Keymap,
        glyphs: &'a dyn GlyphSource,
        presentation: Presentation,
        framebuffer: &FramebufferGeometry,
        axes: AxisRanges,
        rotation: Rotation,
    ) -> EngineResult<Self> {
        let geometry = resolve(framebuffer, rotation)?;
        let mapper = TouchMapper::new(axes, &geometry, presentation.anchor)?;
        let buffer = CompositionBuffer::allocate(&geometry, framebuffer, presentation.anchor)?;
        if geometry.is_degenerate() {
            info!("Screen too small for key rows; touches will not register");
        }
        Ok(Self {
            keymap,
            glyphs,
            presentation,
            axes,
            geometry,
            mapper,
            buffer,
            state: KeyboardState::default(),
            accumulator: SampleAccumulator::default(),
        })
    }

    /// Active geometry.
    pub const fn geometry(&self) -> &KeyboardGeometry {
        &self.geometry
    }

    /// Current interaction state.
    pub const fn state(&self) -> &KeyboardState {
        &self.state
    }

    /// Composition buffer contents.
    pub fn buffer(&self) -> &CompositionBuffer {
        &self.buffer
    }

    fn renderer(&self) -> Renderer<'a> {
        Renderer::new(
            self.geometry,
            self.presentation.anchor,
            self.keymap,
            self.presentation.theme,
            self.glyphs,
        )
    }

    /// Draws the whole keyboard and blits it.
    pub fn redraw(&mut self, framebuffer: &mut dyn FramebufferSink) -> EngineResult<()> {
        let renderer = self.renderer();
        renderer.draw(&mut self.buffer, &self.state);
        self.buffer.blit(framebuffer)
    }

    fn redraw_keys(
        &mut self,
        ids: &[KeyId],
        framebuffer: &mut dyn FramebufferSink,
    ) -> EngineResult<()> {
        let renderer = self.renderer();
        for &id in ids {
            renderer.draw_key(&mut self.buffer, id, &self.state);
        }
        self.buffer.blit(framebuffer)
    }

    /// Switches to `rotation`: the old band is blanked, then the new
    /// geometry, buffer and mapper take over and are drawn in full. Any
    /// highlighted key is dropped.
    ///
    /// # Errors
    ///
    /// Propagates resolver, allocation and blit failures.
    pub fn reconfigure(
        &mut self,
        rotation: Rotation,
        framebuffer: &mut dyn FramebufferSink,
    ) -> EngineResult<()> {
        let native = framebuffer.geometry();
        let geometry = resolve(&native, rotation)?;
        let mapper = TouchMapper::new(self.axes, &geometry, self.presentation.anchor)?;
        let buffer = CompositionBuffer::allocate(&geometry, &native, self.presentation.anchor)?;

        self.buffer.clear();
        self.buffer.blit(framebuffer)?;

        self.mapper = mapper;
        self.buffer = buffer;
        self.geometry = geometry;
        self.state.pressed = None;
        self.redraw(framebuffer)
    }

    /// Applies one touch event.
    ///
    /// # Errors
    ///
    /// Propagates key output and blit failures.
    pub fn handle_event(
        &mut self,
        event: TouchEvent,
        keys: &mut dyn KeySink,
        framebuffer: &mut dyn FramebufferSink,
    ) -> EngineResult<()> {
        match self.accumulator.feed(event) {
            Some(frame) => self.handle_frame(frame, keys, framebuffer),
            None => Ok(()),
        }
    }

    /// Applies one completed frame.
    ///
    /// # Errors
    ///
    /// Propagates key output and blit failures.
    pub fn handle_frame(
        &mut self,
        frame: TouchFrame,
        keys: &mut dyn KeySink,
        framebuffer: &mut dyn FramebufferSink,
    ) -> EngineResult<()> {
        trace!(?frame, "touch frame");
        if frame.contact {
            let under = frame
                .sample
                .and_then(|sample| self.mapper.map(sample))
                .and_then(|hit| self.keymap.key_at(hit, self.geometry.logical_width));
            if under == self.state.pressed {
                return Ok(());
            }
            let previous = std::mem::replace(&mut self.state.pressed, under);
            let changed: Vec<KeyId> = previous.into_iter().chain(under).collect();
            return self.redraw_keys(&changed, framebuffer);
        }

        let Some(id) = self.state.pressed.take() else {
            return Ok(());
        };
        if self.activate(id, keys)? {
            self.redraw(framebuffer)
        } else {
            self.redraw_keys(&[id], framebuffer)
        }
    }

    /// Acts on a released key. Returns whether the latch set changed,
    /// which affects labels and modifier caps across the keyboard.
    fn activate(&mut self, id: KeyId, keys: &mut dyn KeySink) -> EngineResult<bool> {
        let Some(key) = self.keymap.key(id) else {
            return Ok(false);
        };
        match key.action {
            KeyAction::Emit(code) => {
                let modifiers: Vec<u16> = self.state.latched.iter().map(|m| m.code()).collect();
                debug!("Emit '{}' (code {code}) with {modifiers:?}", key.label);
                keys.tap(code, &modifiers)?;
                let had_latches = !self.state.latched.is_empty();
                self.state.latched.clear();
                Ok(had_latches)
            }
            KeyAction::Latch(modifier) => {
                let active = self.state.toggle(modifier);
                debug!("{modifier:?} latch {}", if active { "armed" } else { "released" });
                Ok(true)
            }
        }
    }

    /// Runs until `cancel` is set. The initial draw happens first.
    ///
    /// Cancellation is observed between reads only: a touch device that
    /// never reports blocks the loop indefinitely.
    ///
    /// # Errors
    ///
    /// Any device or blit failure ends the loop.
    pub fn run(&mut self, devices: &mut Devices<'_>, cancel: &CancelToken) -> EngineResult<()> {
        self.redraw(devices.framebuffer)?;
        while !cancel.is_cancelled() {
            if let Some(source) = devices.rotation.as_deref_mut() {
                if let Some(rotation) = source.current() {
                    if rotation != self.geometry.rotation {
                        info!("Rotation changed: {} -> {}", self.geometry.rotation, rotation);
                        self.reconfigure(rotation, devices.framebuffer)?;
                    }
                }
            }
            for event in devices.touch.read_events()? {
                self.handle_event(event, devices.keys, devices.framebuffer)?;
            }
        }
        info!("Event loop stopped");
        Ok(())
    }
}
