//! Storage configuration.
//!
//! # Responsibility
//! - Carry the storage location as an explicit value into the record store.
//!
//! # Invariants
//! - Core never keeps the data path in global mutable state.

use std::path::{Path, PathBuf};

/// Default file name for the persisted record collection.
pub const DEFAULT_DATA_FILE_NAME: &str = "data.txt";

/// Environment variable consulted by [`StoreConfig::from_env`].
pub const DATA_FILE_ENV: &str = "RANGEBOOK_DATA_FILE";

/// Where the record collection lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_path: PathBuf,
}

impl StoreConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Uses [`DEFAULT_DATA_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_DATA_FILE_NAME))
    }

    /// Reads `RANGEBOOK_DATA_FILE`, falling back to `data.txt` in the
    /// working directory when unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(DATA_FILE_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::new(DEFAULT_DATA_FILE_NAME),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}
