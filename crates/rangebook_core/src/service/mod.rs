//! Core use-case services.
//!
//! # Responsibility
//! - Expose list/create/filter/delete entry points to presentation layers.
//! - Keep callers decoupled from storage details.

pub mod record_service;
