//! Integrity code the host verifies before accepting the database file.
//!
//! This is an augmented CRC: polynomial 0x1021, zero initial register, bits fed
//! most-significant first, followed by sixteen zero bits to flush the
//! register. The result must match the host bit for bit.

use super::image::DatabaseImage;

const POLY: u16 = 0x1021;

/// Shift one bit into the register, reducing when the outgoing bit is set.
fn step(register: u16, bit: u16) -> u16 {
    let feedback = if register & 0x8000 != 0 { POLY } else { 0 };
    ((register << 1) | bit) ^ feedback
}

/// Checksum of an arbitrary byte sequence.
pub fn compute(bytes: &[u8]) -> u16 {
    let mut register = 0u16;
    for &byte in bytes {
        for bit in (0..8).rev() {
            register = step(register, u16::from((byte >> bit) & 1));
        }
    }
    for _ in 0..16 {
        register = step(register, 0);
    }
    register
}

/// Checksum of an image, excluding its trailing checksum field.
pub fn image_checksum(image: &DatabaseImage) -> u16 {
    compute(image.checksummed_bytes())
}

/// Recompute the checksum and store it in the image. Returns the new value.
pub fn seal(image: &mut DatabaseImage) -> u16 {
    let value = image_checksum(image);
    image.set_checksum(value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileName;

    #[test]
    fn matches_published_check_value() {
        // Augmenting with zero bits makes this equal to CRC-16/XMODEM.
        assert_eq!(compute(b"123456789"), 0x31C3);
        assert_eq!(compute(b"A"), 0x58E5);
    }

    #[test]
    fn empty_and_zero_input_give_zero() {
        assert_eq!(compute(&[]), 0);
        assert_eq!(compute(&[0u8; 64]), 0);
    }

    #[test]
    fn flush_bits_are_not_optional() {
        // A register without the trailing sixteen steps would just hold the
        // raw input for short messages.
        assert_ne!(compute(&[0x12, 0x34]), 0x1234);
    }

    #[test]
    fn deterministic_over_same_bytes() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(compute(&data), compute(&data));
    }

    #[test]
    fn seal_ignores_previous_checksum() {
        let mut image = DatabaseImage::blank();
        image.set_name(5, &ProfileName::from_ascii("Foo"));
        image.set_checksum(0xFFFF);
        let first = seal(&mut image);
        image.set_checksum(0x0000);
        let second = seal(&mut image);

        assert_eq!(first, 0xBC1D);
        assert_eq!(first, second);
        assert_eq!(image.stored_checksum(), 0xBC1D);
    }
}
