//! Core record keeping for date-ranged numeric records.
//! This crate is the single source of truth for storage and filter invariants.

pub mod config;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use filter::range::{filter_by_start_date, filter_records, DateRange, RangeError};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::input::{parse_date, parse_number, RecordInput};
pub use model::record::{format_timestamp, Record, RecordValidationError};
pub use repo::record_store::{
    JsonFileRecordStore, RecordStore, RemoveOutcome, StoreError, StoreResult,
};
pub use service::record_service::{
    DeleteOutcome, FilteredRecords, RecordService, RecordServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
