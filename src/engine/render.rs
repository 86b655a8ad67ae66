//! Keyboard rendering into a composition canvas.

use serde::{Deserialize, Serialize};

use crate::models::{Anchor, KeyAction, KeyId, KeyboardGeometry, Keymap, Modifier, RgbColor};

use super::composition::Canvas;
use super::glyph::GlyphSource;

/// Colors used to draw the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Gaps between keys
    pub background: RgbColor,
    /// Idle key cap
    pub key: RgbColor,
    /// Key cap under the finger
    pub key_pressed: RgbColor,
    /// Label ink
    pub label: RgbColor,
    /// Line separating the keyboard from the rest of the screen
    pub divider: RgbColor,
    /// Modifier key cap while latched
    pub modifier_active: RgbColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: RgbColor::new(0x10, 0x10, 0x10),
            key: RgbColor::new(0x3A, 0x3A, 0x3A),
            key_pressed: RgbColor::new(0x80, 0x80, 0x80),
            label: RgbColor::new(0xF0, 0xF0, 0xF0),
            divider: RgbColor::new(0xA0, 0xA0, 0xA0),
            modifier_active: RgbColor::new(0x2E, 0x5E, 0x9E),
        }
    }
}

/// Interaction state reflected in the drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    /// Key currently under the finger
    pub pressed: Option<KeyId>,
    /// Modifiers latched for the next key
    pub latched: Vec<Modifier>,
}

impl KeyboardState {
    /// Whether `modifier` is latched.
    pub fn is_latched(&self, modifier: Modifier) -> bool {
        self.latched.contains(&modifier)
    }

    /// Toggles `modifier`, returning its new state.
    pub fn toggle(&mut self, modifier: Modifier) -> bool {
        if let Some(pos) = self.latched.iter().position(|&m| m == modifier) {
            self.latched.remove(pos);
            false
        } else {
            self.latched.push(modifier);
            true
        }
    }
}

/// Draws keys into a canvas sized by `KeyboardGeometry`.
pub struct Renderer<'a> {
    geometry: KeyboardGeometry,
    anchor: Anchor,
    keymap: &'a Keymap,
    theme: Theme,
    glyphs: &'a dyn GlyphSource,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer.
    pub fn new(
        geometry: KeyboardGeometry,
        anchor: Anchor,
        keymap: &'a Keymap,
        theme: Theme,
        glyphs: &'a dyn GlyphSource,
    ) -> Self {
        Self {
            geometry,
            anchor,
            keymap,
            theme,
            glyphs,
        }
    }

    /// Canvas line where the first key row starts.
    pub const fn keys_top(&self) -> u32 {
        match self.anchor {
            Anchor::Top => 0,
            Anchor::Bottom => crate::constants::DIVIDER_LINES,
        }
    }

    /// Canvas line holding the divider.
    pub const fn divider_line(&self) -> u32 {
        match self.anchor {
            Anchor::Top => self.geometry.keys_height(),
            Anchor::Bottom => 0,
        }
    }

    /// Redraws the whole keyboard.
    pub fn draw(&self, canvas: &mut dyn Canvas, state: &KeyboardState) {
        let width = canvas.width();
        let height = canvas.height();
        canvas.fill_rect(0, 0, width, height, self.theme.background);
        canvas.fill_rect(0, self.divider_line(), width, 1, self.theme.divider);
        for (id, _) in self.keymap.keys() {
            self.draw_key(canvas, id, state);
        }
    }

    /// Redraws a single key cap and its label.
    pub fn draw_key(&self, canvas: &mut dyn Canvas, id: KeyId, state: &KeyboardState) {
        let Some(key) = self.keymap.key(id) else {
            return;
        };
        let Some((start, end)) = self.keymap.key_span(id, self.geometry.logical_width) else {
            return;
        };
        let row_height = self.geometry.row_height_px;
        if row_height == 0 || end <= start {
            return;
        }
        let top = self.keys_top() + id.row as u32 * row_height;
        let width = end - start;

        let fill = if state.pressed == Some(id) {
            self.theme.key_pressed
        } else if matches!(key.action, KeyAction::Latch(m) if state.is_latched(m)) {
            self.theme.modifier_active
        } else {
            self.theme.key
        };

        // Gap column/line on each side once there is room for it.
        let (cap_x, cap_w) = if width > 2 { (start + 1, width - 2) } else { (start, width) };
        let (cap_y, cap_h) = if row_height > 2 {
            (top + 1, row_height - 2)
        } else {
            (top, row_height)
        };
        canvas.fill_rect(start, top, width, row_height, self.theme.background);
        canvas.fill_rect(cap_x, cap_y, cap_w, cap_h, fill);

        let label = key.label_for(state.is_latched(Modifier::Shift));
        let chars = label.chars().count().max(1) as u32;
        let Some(glyph) = self.glyphs.glyph(label, (cap_h / 2).min(cap_w / chars)) else {
            return;
        };
        if glyph.width > cap_w || glyph.height > cap_h {
            return;
        }
        let origin_x = cap_x + (cap_w - glyph.width) / 2;
        let origin_y = cap_y + (cap_h - glyph.height) / 2;
        for y in 0..glyph.height {
            for x in 0..glyph.width {
                if glyph.coverage(x, y) >= 0x80 {
                    canvas.put_pixel(origin_x + x, origin_y + y, self.theme.label);
                }
            }
        }
    }
}
