//! sbudget-storage-json
//!
//! Filesystem persistence for Simple Budget: a JSON-file key-value store and
//! the timestamped export archive.

mod export;
mod file_store;
mod fs_util;

pub use export::{ExportArchive, ExportInfo, DEFAULT_EXPORT_RETENTION};
pub use file_store::JsonFileStore;
