//! Persistence module split across logical submodules: the byte layout of the
//! database file, its checksum, the occupied-record index, and the store that
//! moves the image between disk and memory.

pub mod checksum;
mod error;
pub mod image;
mod index;
mod store;

pub use error::StoreError;
pub use image::DatabaseImage;
pub use index::RecordIndex;
pub use store::DatabaseStore;
