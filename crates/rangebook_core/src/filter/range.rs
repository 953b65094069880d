//! Start-date range filter.
//!
//! # Responsibility
//! - Parse and validate an optional `[start, end]` window.
//! - Keep records whose `start_date` lies inside the window.
//!
//! # Invariants
//! - Bounds are inclusive; `end <= start` is rejected when both are set.
//! - Only `Record::start_date` decides membership. `end_date` is ignored, so a
//!   record that starts before the window is excluded even if it overlaps it.
//! - Output keeps input order.

use crate::model::input::parse_date;
use crate::model::record::{format_timestamp, Record};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RangeResult<T> = Result<T, RangeError>;

/// Invalid range window input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Start bound was provided but could not be parsed.
    InvalidStart(String),
    /// End bound was provided but could not be parsed.
    InvalidEnd(String),
    /// Both bounds set and `end <= start`.
    EmptyWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStart(raw) => write!(f, "invalid date range: bad start `{raw}`"),
            Self::InvalidEnd(raw) => write!(f, "invalid date range: bad end `{raw}`"),
            Self::EmptyWindow { start, end } => write!(
                f,
                "invalid date range: end ({}) must be after start ({})",
                format_timestamp(end),
                format_timestamp(start)
            ),
        }
    }
}

impl Error for RangeError {}

/// Optional inclusive window over record start dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Window that matches every record.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds a window from already-parsed bounds.
    ///
    /// # Errors
    /// - `EmptyWindow` when both bounds are set and `end <= start`.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> RangeResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(RangeError::EmptyWindow { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Builds a window from raw form input.
    ///
    /// `None` and blank strings both mean "no bound".
    pub fn parse(start_raw: Option<&str>, end_raw: Option<&str>) -> RangeResult<Self> {
        let start = parse_bound(start_raw, RangeError::InvalidStart)?;
        let end = parse_bound(end_raw, RangeError::InvalidEnd)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `record` starts inside this window.
    pub fn contains(&self, record: &Record) -> bool {
        let anchor = record.start_date();
        self.start.map_or(true, |start| anchor >= start)
            && self.end.map_or(true, |end| anchor <= end)
    }
}

fn parse_bound(
    raw: Option<&str>,
    invalid: fn(String) -> RangeError,
) -> RangeResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| invalid(value.to_string())),
    }
}

/// Returns the records that start inside `range`, in input order.
pub fn filter_records(records: &[Record], range: &DateRange) -> Vec<Record> {
    if range.is_unbounded() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| range.contains(record))
        .cloned()
        .collect()
}

/// Validates the bounds and filters in one call.
pub fn filter_by_start_date(
    records: &[Record],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> RangeResult<Vec<Record>> {
    let range = DateRange::new(start, end)?;
    Ok(filter_records(records, &range))
}
