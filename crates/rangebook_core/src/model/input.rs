//! Raw input parsing for record creation and range queries.
//!
//! # Responsibility
//! - Parse form-style string input into numbers and UTC timestamps.
//! - Apply the record creation checks in a fixed order.
//!
//! # Invariants
//! - Input is trimmed before parsing; blank input counts as missing.
//! - Timestamps without an explicit offset are interpreted as UTC.
//! - No partial record is produced on any failure.

use crate::model::record::{truncate_to_millis, Record, RecordValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid decimal regex")
});

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a decimal number from raw input.
///
/// # Errors
/// - `InvalidNumber` for blank or non-decimal text (including `NaN`/`inf`).
/// - `NonFiniteNumber` when the literal overflows `f64`.
pub fn parse_number(raw: &str) -> Result<f64, RecordValidationError> {
    let trimmed = raw.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return Err(RecordValidationError::InvalidNumber(trimmed.to_string()));
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| RecordValidationError::InvalidNumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(RecordValidationError::NonFiniteNumber);
    }
    Ok(value)
}

/// Parses a date or timestamp from raw input and normalizes it to UTC.
///
/// Accepted forms:
/// - RFC 3339 with any offset (`2024-01-01T10:00:00+02:00`).
/// - Local date-time without offset (`2024-01-01T10:00`), taken as UTC.
/// - Plain date (`2024-01-01`), taken as UTC midnight.
///
/// The result is truncated to whole milliseconds.
/// Returns `None` for blank or unrecognized input.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    parse_date_exact(raw).map(truncate_to_millis)
}

fn parse_date_exact(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(value.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|value| value.and_utc())
}

/// Raw record creation input as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInput {
    pub number: String,
    pub start_date: String,
    pub end_date: String,
}

impl RecordInput {
    pub fn new(
        number: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Validates raw input and builds a record.
    ///
    /// Check order: number, required start, required end, parseable start,
    /// parseable end, strict `end > start`. The first failure is returned.
    pub fn to_record(&self) -> Result<Record, RecordValidationError> {
        let number = parse_number(&self.number)?;

        let start_raw = self.start_date.trim();
        if start_raw.is_empty() {
            return Err(RecordValidationError::MissingStartDate);
        }
        let end_raw = self.end_date.trim();
        if end_raw.is_empty() {
            return Err(RecordValidationError::MissingEndDate);
        }

        let start = parse_date(start_raw)
            .ok_or_else(|| RecordValidationError::InvalidStartDate(start_raw.to_string()))?;
        let end = parse_date(end_raw)
            .ok_or_else(|| RecordValidationError::InvalidEndDate(end_raw.to_string()))?;

        Record::new(number, start, end)
    }
}
