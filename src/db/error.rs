use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while moving the database image between disk and memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("database image is {read} bytes, expected {expected}")]
    CorruptImage { read: usize, expected: usize },
    #[error("wrote {written} of {expected} bytes, the file may be corrupted")]
    ShortWrite { written: usize, expected: usize },
}

impl StoreError {
    /// Raw code shown to the operator next to the message: the OS error code
    /// for I/O failures, the byte count for size mismatches.
    pub fn code(&self) -> Option<i64> {
        match self {
            StoreError::Io { source, .. } => source.raw_os_error().map(i64::from),
            StoreError::CorruptImage { read, .. } => Some(*read as i64),
            StoreError::ShortWrite { written, .. } => Some(*written as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_errors_report_byte_counts() {
        let err = StoreError::ShortWrite {
            written: 12,
            expected: 40,
        };
        assert_eq!(err.code(), Some(12));
        assert!(err.to_string().contains("12 of 40"));
    }

    #[test]
    fn io_errors_carry_os_code() {
        let err = StoreError::Io {
            path: PathBuf::from("/nope"),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(err.code(), Some(2));
        assert!(err.to_string().starts_with("could not access /nope"));
    }
}
