//! Value types that travel between the database image and the TUI. They are
//! plain copies of the on-disk fields so the presentation layer never holds a
//! borrow into the image while the editor is open.

use std::fmt;

/// Number of character-code units in every name field.
pub const NAME_LEN: usize = 10;

/// Lowest code unit the character wheel produces (space).
pub const PRINTABLE_MIN: u16 = 0x20;
/// Highest code unit the character wheel produces (tilde).
pub const PRINTABLE_MAX: u16 = 0x7E;

/// A fixed ten-unit name as stored in a record, terminated by the first zero
/// unit (or by running out of room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileName {
    units: [u16; NAME_LEN],
}

impl ProfileName {
    pub fn from_units(units: [u16; NAME_LEN]) -> Self {
        Self { units }
    }

    /// Build a name from ASCII text, truncating to the field width. Only used
    /// for fixtures and tests; the editor works on raw units.
    pub fn from_ascii(text: &str) -> Self {
        let mut units = [0u16; NAME_LEN];
        for (slot, byte) in units.iter_mut().zip(text.bytes()) {
            *slot = u16::from(byte);
        }
        Self { units }
    }

    pub fn units(&self) -> &[u16; NAME_LEN] {
        &self.units
    }

    /// Position of the first zero unit, capped at the field width.
    pub fn len(&self) -> usize {
        self.units
            .iter()
            .position(|&unit| unit == 0)
            .unwrap_or(NAME_LEN)
    }

    /// True when every non-zero unit is printable ASCII, which is what the
    /// editor requires before it will open the name.
    pub fn is_editable(&self) -> bool {
        self.units
            .iter()
            .all(|&unit| unit == 0 || is_printable(unit))
    }
}

impl fmt::Display for ProfileName {
    /// Render the visible part of the name. Units outside printable ASCII show
    /// up as `?` so a foreign-script name still occupies a row in the list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &unit in &self.units[..self.len()] {
            let ch = if is_printable(unit) {
                char::from(unit as u8)
            } else {
                '?'
            };
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Whether a code unit lies in the printable ASCII range.
pub fn is_printable(unit: u16) -> bool {
    (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_stops_at_first_zero() {
        let name = ProfileName::from_units([0x41, 0x42, 0, 0x43, 0, 0, 0, 0, 0, 0]);
        assert_eq!(name.len(), 2);
        assert_eq!(name.to_string(), "AB");
    }

    #[test]
    fn full_name_has_no_terminator() {
        let name = ProfileName::from_ascii("ABCDEFGHIJKL");
        assert_eq!(name.len(), NAME_LEN);
        assert_eq!(name.to_string(), "ABCDEFGHIJ");
    }

    #[test]
    fn non_ascii_units_are_not_editable() {
        let name = ProfileName::from_units([0x30A2, 0x41, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!name.is_editable());
        assert_eq!(name.to_string(), "?A");
        assert!(ProfileName::from_ascii("Foo").is_editable());
    }

    #[test]
    fn hidden_units_after_terminator_are_checked_too() {
        let name = ProfileName::from_units([0x41, 0, 0x07, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!name.is_editable());
    }
}
