//! Core library surface for the profile name editor.
//!
//! The editor opens a fixed-layout, checksummed profile database, lists the
//! occupied records, and renames them with a directional pad and a character
//! wheel before writing the image back with a fresh checksum.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{DatabaseImage, DatabaseStore, RecordIndex, StoreError};

/// Name value type shared by the image and the editor.
pub use models::ProfileName;

/// The interactive application and its frame loop.
pub use ui::{run_app, App};
