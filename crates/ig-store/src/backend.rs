//! The storage port consumed by [`crate::ObfuscatedStore`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist temp file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Parent directory does not exist: {0}")]
    NoParentDir(PathBuf),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key/value storage.
///
/// Mirrors the browser storage contract: missing keys read as `None`,
/// removing a missing key is not an error, and `clear` drops every entry.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}
