//! Record domain model.
//!
//! # Responsibility
//! - Define the only stored entity: a number with a UTC start/end window.
//! - Own the persisted JSON shape (`number`, `startDate`, `endDate`).
//!
//! # Invariants
//! - `number` is finite.
//! - `end_date` is strictly after `start_date`.
//! - Timestamps carry millisecond precision, the precision they are stored with.
//! - Deserialization re-validates, so invalid persisted data is rejected.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for record creation and decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// Raw number input is empty or not a decimal literal.
    InvalidNumber(String),
    /// Number parsed but is `NaN` or infinite.
    NonFiniteNumber,
    MissingStartDate,
    MissingEndDate,
    /// Raw start date input could not be parsed.
    InvalidStartDate(String),
    /// Raw end date input could not be parsed.
    InvalidEndDate(String),
    /// `end` is equal to or earlier than `start`.
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(raw) => write!(f, "`{raw}` is not a valid number"),
            Self::NonFiniteNumber => write!(f, "number must be finite"),
            Self::MissingStartDate => write!(f, "start date is required"),
            Self::MissingEndDate => write!(f, "end date is required"),
            Self::InvalidStartDate(raw) => write!(f, "`{raw}` is not a valid start date"),
            Self::InvalidEndDate(raw) => write!(f, "`{raw}` is not a valid end date"),
            Self::InvalidWindow { start, end } => write!(
                f,
                "end date ({}) must be after start date ({})",
                format_timestamp(end),
                format_timestamp(start)
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// One stored entry: a numeric value observed over `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire", into = "RecordWire")]
pub struct Record {
    number: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl Record {
    /// Creates a validated record.
    ///
    /// Both timestamps are truncated to whole milliseconds before the window
    /// check, so a window that collapses on truncation is rejected.
    ///
    /// # Errors
    /// - `NonFiniteNumber` when `number` is `NaN` or infinite.
    /// - `InvalidWindow` when `end_date <= start_date`.
    pub fn new(
        number: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            number,
            start_date: truncate_to_millis(start_date),
            end_date: truncate_to_millis(end_date),
        };
        record.validate()?;
        Ok(record)
    }

    /// Re-checks record invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if !self.number.is_finite() {
            return Err(RecordValidationError::NonFiniteNumber);
        }
        if self.end_date <= self.start_date {
            return Err(RecordValidationError::InvalidWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    pub fn number(&self) -> f64 {
        self.number
    }

    /// Anchor used by range filtering.
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }
}

/// Drops sub-millisecond precision.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

/// Formats a timestamp the way it is persisted: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordWire {
    number: f64,
    #[serde(with = "iso_millis")]
    start_date: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    end_date: DateTime<Utc>,
}

impl TryFrom<RecordWire> for Record {
    type Error = RecordValidationError;

    fn try_from(value: RecordWire) -> Result<Self, Self::Error> {
        Record::new(value.number, value.start_date, value.end_date)
    }
}

impl From<Record> for RecordWire {
    fn from(value: Record) -> Self {
        Self {
            number: value.number,
            start_date: value.start_date,
            end_date: value.end_date,
        }
    }
}

mod iso_millis {
    use super::format_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|err| de::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
    }
}
