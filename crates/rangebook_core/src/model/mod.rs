//! Domain model for date-ranged numeric records.
//!
//! # Responsibility
//! - Define the canonical `Record` shape shared by storage and filtering.
//! - Turn raw user input into validated records.
//!
//! # Invariants
//! - A `Record` always holds a finite number and `end_date > start_date`.
//! - Records have no identity; callers address them by position.

pub mod input;
pub mod record;
