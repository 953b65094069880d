//! Record use-case service.
//!
//! # Responsibility
//! - Validate raw input before it reaches the store.
//! - Combine store reads with range filtering for list views.
//! - Translate positional deletes from untrusted indices.
//!
//! # Invariants
//! - Invalid input never reaches `RecordStore::append`.
//! - `FilteredRecords::records` is always the full, unfiltered collection.
//! - Negative or out-of-range delete indices are a silent no-op.

use crate::filter::range::{filter_records, DateRange, RangeError};
use crate::model::input::RecordInput;
use crate::model::record::{Record, RecordValidationError};
use crate::repo::record_store::{RecordStore, RemoveOutcome, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, RecordServiceError>;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum RecordServiceError {
    /// Record creation input was rejected.
    Validation(RecordValidationError),
    /// Filter window input was rejected.
    InvalidRange(RangeError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl RecordServiceError {
    /// Whether this error stems from caller input rather than storage.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidRange(_))
    }
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidRange(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidRange(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for RecordServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RangeError> for RecordServiceError {
    fn from(value: RangeError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<StoreError> for RecordServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// List view envelope for filtered listings.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecords {
    /// Full collection in stored order.
    pub records: Vec<Record>,
    /// Subset of `records` that starts inside the window.
    pub filtered_records: Vec<Record>,
    /// Raw start bound echoed back; empty when absent.
    pub filter_start: String,
    /// Raw end bound echoed back; empty when absent.
    pub filter_end: String,
}

/// Outcome of a positional delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Record),
    /// Index did not address a record; nothing changed.
    NoOp,
}

/// Record service facade over a store implementation.
pub struct RecordService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates a service using the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists every record in stored order.
    pub fn list_all(&self) -> ServiceResult<Vec<Record>> {
        Ok(self.store.load()?)
    }

    /// Validates raw input and appends the resulting record.
    ///
    /// Returns the stored record. On validation failure nothing is written.
    pub fn create(&self, number: &str, start_date: &str, end_date: &str) -> ServiceResult<Record> {
        self.create_from_input(&RecordInput::new(number, start_date, end_date))
    }

    /// Same as [`RecordService::create`] for an already-collected input form.
    pub fn create_from_input(&self, input: &RecordInput) -> ServiceResult<Record> {
        let record = match input.to_record() {
            Ok(record) => record,
            Err(err) => {
                info!("event=record_create module=service status=rejected reason=validation");
                return Err(err.into());
            }
        };

        self.store.append(record.clone())?;
        info!("event=record_create module=service status=ok");
        Ok(record)
    }

    /// Lists all records plus the subset starting inside the raw window.
    ///
    /// Absent or blank bounds leave that side of the window open.
    pub fn list_filtered(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<FilteredRecords> {
        let range = match DateRange::parse(start, end) {
            Ok(range) => range,
            Err(err) => {
                info!("event=record_filter module=service status=rejected reason=invalid_range");
                return Err(err.into());
            }
        };

        let records = self.store.load()?;
        let filtered_records = filter_records(&records, &range);
        info!(
            "event=record_filter module=service status=ok total={} matched={} bounded={}",
            records.len(),
            filtered_records.len(),
            !range.is_unbounded()
        );

        Ok(FilteredRecords {
            records,
            filtered_records,
            filter_start: start.unwrap_or_default().to_string(),
            filter_end: end.unwrap_or_default().to_string(),
        })
    }

    /// Deletes the record at `index`.
    ///
    /// Negative or out-of-range indices are a no-op, not an error.
    pub fn delete_at(&self, index: i64) -> ServiceResult<DeleteOutcome> {
        let Ok(position) = usize::try_from(index) else {
            warn!("event=record_delete module=service status=noop reason=negative_index");
            return Ok(DeleteOutcome::NoOp);
        };

        match self.store.remove_at(position)? {
            RemoveOutcome::Removed(record) => Ok(DeleteOutcome::Deleted(record)),
            RemoveOutcome::OutOfRange { index, len } => {
                warn!(
                    "event=record_delete module=service status=noop reason=out_of_range index={index} len={len}"
                );
                Ok(DeleteOutcome::NoOp)
            }
        }
    }
}
