use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::models::{ProfileName, NAME_LEN, PRINTABLE_MAX, PRINTABLE_MIN};

use super::input::Directions;

const WHEEL_MIN: u8 = PRINTABLE_MIN as u8;
const WHEEL_MAX: u8 = PRINTABLE_MAX as u8;

/// Reasons the editor refuses to open a name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("This profile's name contains non-ASCII characters, which aren't supported.")]
    UnsupportedCharacters { slot: usize },
}

/// Character-wheel editor for one record name.
///
/// Left/right move the cursor over the name plus one append position past its
/// end. Up/down turn the wheel under the cursor through printable ASCII.
/// Turning past either end of the range deletes the character, except at the
/// first position where it wraps to the other end, so a name can never be
/// emptied. Turning at the append position inserts a space or a tilde.
///
/// All edits happen on a private copy; the record only changes on confirm.
#[derive(Debug, Clone)]
pub(crate) struct NameEditor {
    slot: usize,
    buffer: [u8; NAME_LEN],
    cursor: usize,
    len: usize,
}

impl NameEditor {
    /// Start editing the name stored in `slot`.
    pub(crate) fn open(slot: usize, name: &ProfileName) -> Result<Self, EditError> {
        if !name.is_editable() {
            tracing::warn!(slot, "refusing to edit name with unsupported characters");
            return Err(EditError::UnsupportedCharacters { slot });
        }
        let mut buffer = [0u8; NAME_LEN];
        for (byte, &unit) in buffer.iter_mut().zip(name.units()) {
            // `is_editable` guarantees every unit fits in a byte.
            *byte = unit as u8;
        }
        Ok(Self {
            slot,
            buffer,
            cursor: 0,
            len: name.len(),
        })
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Apply one frame of repeated directions: horizontal moves first, then
    /// vertical turns the wheel (up is forwards).
    pub(crate) fn apply(&mut self, fired: Directions) {
        self.move_cursor(fired.horizontal());
        self.scroll(-fired.vertical());
    }

    /// Move the cursor, wrapping between the first position and the append
    /// position.
    pub(crate) fn move_cursor(&mut self, delta: i32) {
        let len = self.len as i32;
        let mut next = self.cursor as i32 + delta;
        if next < 0 {
            next = len;
        }
        if next > len {
            next = 0;
        }
        self.cursor = next as usize;
    }

    /// Turn the character wheel under the cursor by `delta`.
    pub(crate) fn scroll(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        // A full name has no room at the append position.
        if self.cursor >= NAME_LEN {
            return;
        }

        let at = self.cursor;
        let current = self.buffer[at];
        let next = i32::from(current) + delta;
        let overflow = !(i32::from(WHEEL_MIN)..=i32::from(WHEEL_MAX)).contains(&next);

        if current == 0 || (at == 0 && overflow) {
            if at + 1 < NAME_LEN && current == 0 {
                self.buffer[at + 1] = 0;
            }
            self.buffer[at] = if delta > 0 { WHEEL_MIN } else { WHEEL_MAX };
        } else if overflow {
            self.buffer[at] = 0;
        } else {
            self.buffer[at] = next as u8;
        }

        self.len = self
            .buffer
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(NAME_LEN);
    }

    /// Current working name, including any units hidden past the terminator.
    pub(crate) fn name(&self) -> ProfileName {
        let mut units = [0u16; NAME_LEN];
        for (unit, &byte) in units.iter_mut().zip(self.buffer.iter()) {
            *unit = u16::from(byte);
        }
        ProfileName::from_units(units)
    }

    /// Finish editing and hand back the slot and the name to store.
    pub(crate) fn confirm(self) -> (usize, ProfileName) {
        (self.slot, self.name())
    }

    /// Finish editing without keeping anything.
    pub(crate) fn cancel(self) {
        tracing::debug!(slot = self.slot, "rename cancelled");
    }

    /// `[name]` line followed by the caret line under the cursor.
    pub(crate) fn build_lines(&self) -> [Line<'static>; 2] {
        let text: String = self.buffer[..self.len]
            .iter()
            .map(|&byte| char::from(byte))
            .collect();
        let field = Line::from(vec![
            Span::raw("["),
            Span::styled(text, Style::default().fg(Color::Yellow)),
            Span::raw("]"),
        ]);
        let caret = Line::from(format!("{}^", " ".repeat(self.cursor() + 1)));
        [field, caret]
    }
}
