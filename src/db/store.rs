use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::models::ProfileName;

use super::checksum::{image_checksum, seal};
use super::error::StoreError;
use super::image::{DatabaseImage, IMAGE_SIZE};

/// Owner of the in-memory database image and the file it came from.
#[derive(Debug)]
pub struct DatabaseStore {
    path: PathBuf,
    image: DatabaseImage,
}

impl DatabaseStore {
    /// Read the whole file at `path`. The stored checksum is not verified;
    /// a mismatch is only logged, and the next save writes a fresh one.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let bytes = read_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let image = DatabaseImage::from_bytes(bytes)?;

        let stored = image.stored_checksum();
        let computed = image_checksum(&image);
        if stored != computed {
            tracing::warn!(
                path = %path.display(),
                stored,
                computed,
                "checksum mismatch on load, it will be rewritten on save"
            );
        }
        tracing::info!(path = %path.display(), "loaded profile database");

        Ok(Self { path, image })
    }

    /// Seal the checksum and write the full image back over the existing
    /// file. The file is never created or truncated. On failure the
    /// in-memory image is left as it was, so the caller can retry.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let checksum = seal(&mut self.image);
        let bytes = self.image.as_bytes();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let written = write_image(&mut file, bytes).map_err(|source| self.io_error(source))?;
        if written != IMAGE_SIZE {
            tracing::warn!(written, expected = IMAGE_SIZE, "short write while saving");
            return Err(StoreError::ShortWrite {
                written,
                expected: IMAGE_SIZE,
            });
        }
        file.sync_all().map_err(|source| self.io_error(source))?;

        tracing::info!(
            path = %self.path.display(),
            checksum,
            "saved profile database"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &DatabaseImage {
        &self.image
    }

    /// Write a committed name into its record.
    pub fn commit_name(&mut self, slot: usize, name: &ProfileName) {
        tracing::debug!(slot, name = %name, "committing name");
        self.image.set_name(slot, name);
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::with_capacity(IMAGE_SIZE);
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Write as much of `bytes` as the writer accepts, returning the count. A
/// writer that stops accepting data yields a short count rather than an error.
fn write_image<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(written)
}
