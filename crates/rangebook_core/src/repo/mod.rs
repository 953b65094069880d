//! Repository layer for the record collection.
//!
//! # Responsibility
//! - Define the storage contract consumed by services.
//! - Keep file format and atomic-write details inside the persistence boundary.
//!
//! # Invariants
//! - Only records that passed `Record` validation are ever written.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod record_store;
