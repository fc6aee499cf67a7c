//! Fixed byte layout of the profile database file.
//!
//! The image is kept as raw bytes and every interpreted field is read or
//! written at a documented offset. Multi-byte values are big-endian, matching
//! the host that consumes the file. Anything not named here (header, record
//! flags and extra data, padding, the trailing payload) is opaque and must
//! round-trip untouched.

use crate::models::{ProfileName, NAME_LEN};

use super::error::StoreError;

pub const HEADER_LEN: usize = 4;
pub const RECORD_COUNT: usize = 100;
pub const RECORD_LEN: usize = 74;
pub const RECORDS_OFFSET: usize = HEADER_LEN;

/// Offsets inside a single record.
const RECORD_FLAGS_LEN: usize = 2;
const RECORD_NAME_OFFSET: usize = RECORD_FLAGS_LEN;
const RECORD_EXTRA_LEN: usize = 32;
const RECORD_CREATOR_OFFSET: usize = RECORD_NAME_OFFSET + NAME_LEN * 2 + RECORD_EXTRA_LEN;

pub const PADDING_OFFSET: usize = RECORDS_OFFSET + RECORD_COUNT * RECORD_LEN;
pub const PADDING_LEN: usize = 20;
pub const PAYLOAD_OFFSET: usize = PADDING_OFFSET + PADDING_LEN;
pub const PAYLOAD_LEN: usize = 0x1D4DE;
pub const CHECKSUM_OFFSET: usize = PAYLOAD_OFFSET + PAYLOAD_LEN;
pub const IMAGE_SIZE: usize = CHECKSUM_OFFSET + 2;

const _: () = assert!(RECORD_CREATOR_OFFSET + NAME_LEN * 2 == RECORD_LEN);
const _: () = assert!(IMAGE_SIZE == 0x1F1E0);

/// The whole database file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseImage {
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for DatabaseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseImage")
            .field("len", &self.bytes.len())
            .field("checksum", &self.stored_checksum())
            .finish()
    }
}

impl DatabaseImage {
    /// An all-zero image: no occupied records.
    pub fn blank() -> Self {
        Self {
            bytes: vec![0u8; IMAGE_SIZE].into_boxed_slice(),
        }
    }

    /// Adopt raw file contents, rejecting anything that is not exactly one
    /// image long.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, StoreError> {
        if bytes.len() != IMAGE_SIZE {
            return Err(StoreError::CorruptImage {
                read: bytes.len(),
                expected: IMAGE_SIZE,
            });
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes covered by the checksum: everything before the trailing field.
    pub fn checksummed_bytes(&self) -> &[u8] {
        &self.bytes[..CHECKSUM_OFFSET]
    }

    pub fn stored_checksum(&self) -> u16 {
        u16::from_be_bytes([self.bytes[CHECKSUM_OFFSET], self.bytes[CHECKSUM_OFFSET + 1]])
    }

    pub fn set_checksum(&mut self, value: u16) {
        self.bytes[CHECKSUM_OFFSET..].copy_from_slice(&value.to_be_bytes());
    }

    pub fn name(&self, slot: usize) -> ProfileName {
        ProfileName::from_units(self.read_units(record_offset(slot) + RECORD_NAME_OFFSET))
    }

    /// Overwrite all ten name units of a record.
    pub fn set_name(&mut self, slot: usize, name: &ProfileName) {
        let start = record_offset(slot) + RECORD_NAME_OFFSET;
        for (i, unit) in name.units().iter().enumerate() {
            let at = start + i * 2;
            self.bytes[at..at + 2].copy_from_slice(&unit.to_be_bytes());
        }
    }

    pub fn creator_name(&self, slot: usize) -> ProfileName {
        ProfileName::from_units(self.read_units(record_offset(slot) + RECORD_CREATOR_OFFSET))
    }

    /// A slot is occupied when the first unit of its name is non-zero.
    pub fn is_occupied(&self, slot: usize) -> bool {
        let at = record_offset(slot) + RECORD_NAME_OFFSET;
        self.bytes[at] != 0 || self.bytes[at + 1] != 0
    }

    fn read_units(&self, start: usize) -> [u16; NAME_LEN] {
        let mut units = [0u16; NAME_LEN];
        for (i, unit) in units.iter_mut().enumerate() {
            let at = start + i * 2;
            *unit = u16::from_be_bytes([self.bytes[at], self.bytes[at + 1]]);
        }
        units
    }
}

/// Byte offset of a record slot. Panics on slots past the table, which is a
/// programming error since slots only come from the record index.
fn record_offset(slot: usize) -> usize {
    assert!(slot < RECORD_COUNT, "record slot {slot} out of range");
    RECORDS_OFFSET + slot * RECORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_host_file_size() {
        assert_eq!(PADDING_OFFSET, 0x1CEC);
        assert_eq!(PAYLOAD_OFFSET, 0x1D00);
        assert_eq!(CHECKSUM_OFFSET, 0x1F1DE);
        assert_eq!(IMAGE_SIZE, 127_456);
    }

    #[test]
    fn rejects_wrong_sizes() {
        let err = DatabaseImage::from_bytes(vec![0; IMAGE_SIZE - 1]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::CorruptImage { read, expected } if read == IMAGE_SIZE - 1 && expected == IMAGE_SIZE
        ));
        assert!(DatabaseImage::from_bytes(vec![0; IMAGE_SIZE + 1]).is_err());
    }

    #[test]
    fn names_are_big_endian_units() {
        let mut image = DatabaseImage::blank();
        image.set_name(5, &ProfileName::from_ascii("Foo"));

        let at = RECORDS_OFFSET + 5 * RECORD_LEN + 2;
        assert_eq!(&image.as_bytes()[at..at + 6], &[0, b'F', 0, b'o', 0, b'o']);
        assert_eq!(image.name(5).to_string(), "Foo");
        assert!(image.is_occupied(5));
        assert!(!image.is_occupied(4));
    }

    #[test]
    fn high_byte_alone_marks_occupancy() {
        let mut bytes = vec![0u8; IMAGE_SIZE];
        bytes[RECORDS_OFFSET + 2] = 0x30;
        let image = DatabaseImage::from_bytes(bytes).unwrap();
        assert!(image.is_occupied(0));
        assert!(!image.name(0).is_editable());
    }

    #[test]
    fn set_name_leaves_neighbouring_fields_alone() {
        let mut bytes: Vec<u8> = (0..IMAGE_SIZE).map(|i| (i % 251) as u8).collect();
        let record = RECORDS_OFFSET + 7 * RECORD_LEN;
        let original = bytes.clone();
        bytes[record + 2..record + 22].fill(0);
        let mut image = DatabaseImage::from_bytes(bytes).unwrap();

        image.set_name(7, &ProfileName::from_ascii("Zed"));

        let out = image.as_bytes();
        assert_eq!(&out[..record + 2], &original[..record + 2]);
        assert_eq!(&out[record + 22..], &original[record + 22..]);
        assert_eq!(image.creator_name(7).units(), &image.read_units(record + 54));
    }

    #[test]
    fn checksum_field_is_last_two_bytes() {
        let mut image = DatabaseImage::blank();
        image.set_checksum(0xBEEF);
        assert_eq!(&image.as_bytes()[IMAGE_SIZE - 2..], &[0xBE, 0xEF]);
        assert_eq!(image.stored_checksum(), 0xBEEF);
        assert_eq!(image.checksummed_bytes().len(), IMAGE_SIZE - 2);
    }
}
