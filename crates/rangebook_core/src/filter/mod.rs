//! Date-range selection over record collections.
//!
//! # Responsibility
//! - Validate optional range windows.
//! - Select records whose start date falls inside a window.
//!
//! # Invariants
//! - Filtering is pure: input collections are never mutated or reordered.

pub mod range;
