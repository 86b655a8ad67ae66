//! The fixed five-row key grid.
//!
//! Key codes are Linux input event codes (`linux/input-event-codes.h`),
//! which are stable ABI and are emitted unchanged through uinput.

use serde::Serialize;

use crate::constants::ROW_COUNT;

use super::KeyHit;

/// Modifiers that latch for the next key instead of emitting on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Modifier {
    /// Left shift
    Shift,
    /// Left control
    Ctrl,
}

impl Modifier {
    /// Key code sent while the modifier is held.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Shift => codes::KEY_LEFTSHIFT,
            Self::Ctrl => codes::KEY_LEFTCTRL,
        }
    }
}

/// What touching and releasing a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyAction {
    /// Emit a key code
    Emit(u16),
    /// Toggle a one-shot modifier latch
    Latch(Modifier),
}

/// One key cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Key {
    /// Label drawn on the cap
    pub label: &'static str,
    /// Label drawn while shift is latched
    pub shifted_label: &'static str,
    /// Behaviour on release
    pub action: KeyAction,
    /// Relative width within its row
    pub width_units: u32,
}

impl Key {
    const fn emit(label: &'static str, shifted_label: &'static str, code: u16) -> Self {
        Self {
            label,
            shifted_label,
            action: KeyAction::Emit(code),
            width_units: 2,
        }
    }

    const fn wide(mut self, width_units: u32) -> Self {
        self.width_units = width_units;
        self
    }

    const fn latch(label: &'static str, modifier: Modifier) -> Self {
        Self {
            label,
            shifted_label: label,
            action: KeyAction::Latch(modifier),
            width_units: 3,
        }
    }

    /// Label to draw given the shift latch state.
    #[must_use]
    pub const fn label_for(&self, shifted: bool) -> &'static str {
        if shifted {
            self.shifted_label
        } else {
            self.label
        }
    }
}

/// Position of a key inside the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyId {
    /// Row index
    pub row: usize,
    /// Index within the row
    pub index: usize,
}

impl KeyId {
    /// Creates a key id.
    #[must_use]
    pub const fn new(row: usize, index: usize) -> Self {
        Self { row, index }
    }
}

/// Five rows of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    rows: Vec<Vec<Key>>,
}

impl Keymap {
    /// Builds a keymap from explicit rows.
    ///
    /// Returns `None` unless there are exactly `ROW_COUNT` non-empty rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Key>>) -> Option<Self> {
        if rows.len() != ROW_COUNT as usize || rows.iter().any(Vec::is_empty) {
            return None;
        }
        Some(Self { rows })
    }

    /// The default US-style layout.
    #[must_use]
    pub fn us() -> Self {
        use codes::*;
        let rows = vec![
            vec![
                Key::emit("Esc", "Esc", KEY_ESC).wide(3),
                Key::emit("1", "!", KEY_1),
                Key::emit("2", "@", KEY_2),
                Key::emit("3", "#", KEY_3),
                Key::emit("4", "$", KEY_4),
                Key::emit("5", "%", KEY_5),
                Key::emit("6", "^", KEY_6),
                Key::emit("7", "&", KEY_7),
                Key::emit("8", "*", KEY_8),
                Key::emit("9", "(", KEY_9),
                Key::emit("0", ")", KEY_0),
                Key::emit("Bksp", "Bksp", KEY_BACKSPACE).wide(3),
            ],
            vec![
                Key::emit("Tab", "Tab", KEY_TAB).wide(3),
                Key::emit("q", "Q", KEY_Q),
                Key::emit("w", "W", KEY_W),
                Key::emit("e", "E", KEY_E),
                Key::emit("r", "R", KEY_R),
                Key::emit("t", "T", KEY_T),
                Key::emit("y", "Y", KEY_Y),
                Key::emit("u", "U", KEY_U),
                Key::emit("i", "I", KEY_I),
                Key::emit("o", "O", KEY_O),
                Key::emit("p", "P", KEY_P),
                Key::emit("-", "_", KEY_MINUS).wide(3),
            ],
            vec![
                Key::emit("a", "A", KEY_A),
                Key::emit("s", "S", KEY_S),
                Key::emit("d", "D", KEY_D),
                Key::emit("f", "F", KEY_F),
                Key::emit("g", "G", KEY_G),
                Key::emit("h", "H", KEY_H),
                Key::emit("j", "J", KEY_J),
                Key::emit("k", "K", KEY_K),
                Key::emit("l", "L", KEY_L),
                Key::emit(";", ":", KEY_SEMICOLON),
                Key::emit("Enter", "Enter", KEY_ENTER).wide(4),
            ],
            vec![
                Key::latch("Shift", Modifier::Shift),
                Key::emit("z", "Z", KEY_Z),
                Key::emit("x", "X", KEY_X),
                Key::emit("c", "C", KEY_C),
                Key::emit("v", "V", KEY_V),
                Key::emit("b", "B", KEY_B),
                Key::emit("n", "N", KEY_N),
                Key::emit("m", "M", KEY_M),
                Key::emit(",", "<", KEY_COMMA),
                Key::emit(".", ">", KEY_DOT),
                Key::emit("/", "?", KEY_SLASH).wide(3),
            ],
            vec![
                Key::latch("Ctrl", Modifier::Ctrl),
                Key::emit("'", "\"", KEY_APOSTROPHE),
                Key::emit("", "", KEY_SPACE).wide(12),
                Key::emit("<", "<", KEY_LEFT),
                Key::emit(">", ">", KEY_RIGHT),
                Key::emit("^", "^", KEY_UP),
                Key::emit("v", "v", KEY_DOWN),
            ],
        ];
        Self { rows }
    }

    /// Rows in top-to-bottom order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// Looks up a key by id.
    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.rows.get(id.row)?.get(id.index)
    }

    /// Iterates over every key with its id.
    pub fn keys(&self) -> impl Iterator<Item = (KeyId, &Key)> {
        self.rows.iter().enumerate().flat_map(|(row, keys)| {
            keys.iter()
                .enumerate()
                .map(move |(index, key)| (KeyId::new(row, index), key))
        })
    }

    /// Id of the key carrying a latch for `modifier`.
    #[must_use]
    pub fn modifier_key(&self, modifier: Modifier) -> Option<KeyId> {
        self.keys()
            .find(|(_, key)| key.action == KeyAction::Latch(modifier))
            .map(|(id, _)| id)
    }

    /// Horizontal pixel span `[start, end)` of a key across `logical_width`.
    #[must_use]
    pub fn key_span(&self, id: KeyId, logical_width: u32) -> Option<(u32, u32)> {
        let row = self.rows.get(id.row)?;
        if id.index >= row.len() {
            return None;
        }
        let total = u64::from(row_units(row));
        let before: u32 = row[..id.index].iter().map(|k| k.width_units).sum();
        let after = before + row[id.index].width_units;
        let width = u64::from(logical_width);
        let start = (u64::from(before) * width / total) as u32;
        let end = (u64::from(after) * width / total) as u32;
        Some((start, end))
    }

    /// Resolves a hit to the key under it.
    #[must_use]
    pub fn key_at(&self, hit: KeyHit, logical_width: u32) -> Option<KeyId> {
        let row = self.rows.get(hit.row as usize)?;
        if hit.column >= logical_width {
            return None;
        }
        (0..row.len())
            .map(|index| KeyId::new(hit.row as usize, index))
            .find(|&id| {
                self.key_span(id, logical_width)
                    .is_some_and(|(start, end)| hit.column >= start && hit.column < end)
            })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::us()
    }
}

fn row_units(row: &[Key]) -> u32 {
    row.iter().map(|k| k.width_units).sum::<u32>().max(1)
}

/// Linux input event key codes used by the default keymap.
#[allow(missing_docs)]
pub mod codes {
    pub const KEY_ESC: u16 = 1;
    pub const KEY_1: u16 = 2;
    pub const KEY_2: u16 = 3;
    pub const KEY_3: u16 = 4;
    pub const KEY_4: u16 = 5;
    pub const KEY_5: u16 = 6;
    pub const KEY_6: u16 = 7;
    pub const KEY_7: u16 = 8;
    pub const KEY_8: u16 = 9;
    pub const KEY_9: u16 = 10;
    pub const KEY_0: u16 = 11;
    pub const KEY_MINUS: u16 = 12;
    pub const KEY_BACKSPACE: u16 = 14;
    pub const KEY_TAB: u16 = 15;
    pub const KEY_Q: u16 = 16;
    pub const KEY_W: u16 = 17;
    pub const KEY_E: u16 = 18;
    pub const KEY_R: u16 = 19;
    pub const KEY_T: u16 = 20;
    pub const KEY_Y: u16 = 21;
    pub const KEY_U: u16 = 22;
    pub const KEY_I: u16 = 23;
    pub const KEY_O: u16 = 24;
    pub const KEY_P: u16 = 25;
    pub const KEY_ENTER: u16 = 28;
    pub const KEY_LEFTCTRL: u16 = 29;
    pub const KEY_A: u16 = 30;
    pub const KEY_S: u16 = 31;
    pub const KEY_D: u16 = 32;
    pub const KEY_F: u16 = 33;
    pub const KEY_G: u16 = 34;
    pub const KEY_H: u16 = 35;
    pub const KEY_J: u16 = 36;
    pub const KEY_K: u16 = 37;
    pub const KEY_L: u16 = 38;
    pub const KEY_SEMICOLON: u16 = 39;
    pub const KEY_APOSTROPHE: u16 = 40;
    pub const KEY_LEFTSHIFT: u16 = 42;
    pub const KEY_Z: u16 = 44;
    pub const KEY_X: u16 = 45;
    pub const KEY_C: u16 = 46;
    pub const KEY_V: u16 = 47;
    pub const KEY_B: u16 = 48;
    pub const KEY_N: u16 = 49;
    pub const KEY_M: u16 = 50;
    pub const KEY_COMMA: u16 = 51;
    pub const KEY_DOT: u16 = 52;
    pub const KEY_SLASH: u16 = 53;
    pub const KEY_SPACE: u16 = 57;
    pub const KEY_UP: u16 = 103;
    pub const KEY_LEFT: u16 = 105;
    pub const KEY_RIGHT: u16 = 106;
    pub const KEY_DOWN: u16 = 108;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keymap_has_five_rows() {
        let keymap = Keymap::us();
        assert_eq!(keymap.rows().len(), ROW_COUNT as usize);
        assert!(keymap.modifier_key(Modifier::Shift).is_some());
        assert!(keymap.modifier_key(Modifier::Ctrl).is_some());
    }

    #[test]
    fn test_from_rows_rejects_wrong_shape() {
        assert!(Keymap::from_rows(vec![]).is_none());
        let mut rows = Keymap::us().rows().to_vec();
        rows[2].clear();
        assert!(Keymap::from_rows(rows).is_none());
    }

    #[test]
    fn test_spans_tile_the_row() {
        let keymap = Keymap::us();
        for (row, keys) in keymap.rows().iter().enumerate() {
            let mut expected_start = 0;
            for index in 0..keys.len() {
                let (start, end) = keymap.key_span(KeyId::new(row, index), 480).unwrap();
                assert_eq!(start, expected_start);
                assert!(end >= start);
                expected_start = end;
            }
            assert_eq!(expected_start, 480);
        }
    }

    #[test]
    fn test_key_at_agrees_with_spans() {
        let keymap = Keymap::us();
        let width = 797;
        for (id, _) in keymap.keys() {
            let (start, end) = keymap.key_span(id, width).unwrap();
            for column in start..end {
                let hit = KeyHit::new(id.row as u32, column);
                assert_eq!(keymap.key_at(hit, width), Some(id), "column {column}");
            }
        }
    }

    #[test]
    fn test_key_at_out_of_range() {
        let keymap = Keymap::us();
        assert_eq!(keymap.key_at(KeyHit::new(5, 0), 480), None);
        assert_eq!(keymap.key_at(KeyHit::new(0, 480), 480), None);
    }

    #[test]
    fn test_labels_follow_shift() {
        let keymap = Keymap::us();
        let q = keymap.key(KeyId::new(1, 1)).unwrap();
        assert_eq!(q.label_for(false), "q");
        assert_eq!(q.label_for(true), "Q");
    }
}
