//! Record store contract and JSON file implementation.
//!
//! # Responsibility
//! - Own the persisted record collection; be its only writer.
//! - Express append/remove as read-modify-write of the whole collection.
//!
//! # Invariants
//! - Every mutation rewrites the full collection atomically (temp file + rename).
//! - Mutations hold the writer lock across read, modify and write.
//! - Corrupt persisted data is reported, never silently replaced.
//! - Out-of-range removal performs no write.

use crate::config::StoreConfig;
use crate::model::record::Record;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for record storage.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the data file failed.
    Io { path: PathBuf, source: io::Error },
    /// The data file exists but does not hold a valid record array.
    Corrupt { path: PathBuf, message: String },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "record store I/O failure at `{}`: {source}", path.display())
            }
            Self::Corrupt { path, message } => {
                write!(f, "corrupt record store at `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
        }
    }
}

/// Result of a positional removal.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The record that was removed and persisted away.
    Removed(Record),
    /// Index was outside `0..len`; nothing was written.
    OutOfRange { index: usize, len: usize },
}

/// Storage contract for the record collection.
pub trait RecordStore {
    /// Returns all records in stored order.
    fn load(&self) -> StoreResult<Vec<Record>>;
    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[Record]) -> StoreResult<()>;
    /// Appends one record at the end. Duplicates are allowed.
    fn append(&self, record: Record) -> StoreResult<()>;
    /// Removes the record at `index`, shifting later records down by one.
    fn remove_at(&self, index: usize) -> StoreResult<RemoveOutcome>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self) -> StoreResult<Vec<Record>> {
        (**self).load()
    }

    fn save(&self, records: &[Record]) -> StoreResult<()> {
        (**self).save(records)
    }

    fn append(&self, record: Record) -> StoreResult<()> {
        (**self).append(record)
    }

    fn remove_at(&self, index: usize) -> StoreResult<RemoveOutcome> {
        (**self).remove_at(index)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn load(&self) -> StoreResult<Vec<Record>> {
        (**self).load()
    }

    fn save(&self, records: &[Record]) -> StoreResult<()> {
        (**self).save(records)
    }

    fn append(&self, record: Record) -> StoreResult<()> {
        (**self).append(record)
    }

    fn remove_at(&self, index: usize) -> StoreResult<RemoveOutcome> {
        (**self).remove_at(index)
    }
}

/// Record store backed by one pretty-printed JSON array file.
///
/// The in-process lock serializes writers and keeps readers from observing a
/// half-applied mutation. Writers in other processes are not coordinated.
#[derive(Debug)]
pub struct JsonFileRecordStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileRecordStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.data_path().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> StoreResult<Vec<Record>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|err| StoreError::Corrupt {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn write_records(&self, records: &[Record]) -> StoreResult<()> {
        let payload = serde_json::to_string_pretty(records)
            .map_err(|err| StoreError::io(&self.path, io::Error::other(err)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
            }
        }

        let tmp_path = temp_path_for(&self.path);
        let write_tmp = || -> io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(payload.as_bytes())?;
            file.sync_all()
        };
        if let Err(err) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&tmp_path, err));
        }

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(&self.path, err)
        })
    }

    /// Read-modify-write under the writer lock.
    ///
    /// `mutate` reports whether the collection changed; unchanged collections
    /// are not written back.
    fn update<T>(
        &self,
        event: &str,
        mutate: impl FnOnce(&mut Vec<Record>) -> (T, bool),
    ) -> StoreResult<T> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let started_at = Instant::now();

        let result = self.read_records().and_then(|mut records| {
            let (outcome, changed) = mutate(&mut records);
            if changed {
                self.write_records(&records)?;
            }
            Ok((outcome, changed, records.len()))
        });

        match result {
            Ok((outcome, changed, count)) => {
                info!(
                    "event={event} module=repo status=ok changed={changed} count={count} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    "event={event} module=repo status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

impl RecordStore for JsonFileRecordStore {
    fn load(&self) -> StoreResult<Vec<Record>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);

        match self.read_records() {
            Ok(records) => Ok(records),
            Err(err @ StoreError::Corrupt { .. }) => {
                error!("event=record_load module=repo status=error error_code=store_corrupt error={err}");
                Err(err)
            }
            Err(err) => {
                warn!(
                    "event=record_load module=repo status=degraded error_code=store_read_failed error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[Record]) -> StoreResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let started_at = Instant::now();

        match self.write_records(records) {
            Ok(()) => {
                info!(
                    "event=record_save module=repo status=ok count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=record_save module=repo status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn append(&self, record: Record) -> StoreResult<()> {
        self.update("record_append", |records| {
            records.push(record);
            ((), true)
        })
    }

    fn remove_at(&self, index: usize) -> StoreResult<RemoveOutcome> {
        self.update("record_remove", |records| {
            if index < records.len() {
                (RemoveOutcome::Removed(records.remove(index)), true)
            } else {
                let len = records.len();
                (RemoveOutcome::OutOfRange { index, len }, false)
            }
        })
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".tmp");
    PathBuf::from(raw)
}
