//! Core type definitions for the OARR registry reconciler.
//!
//! This crate defines the small, domain-agnostic types shared by the model,
//! the reconciliation engine and the store client:
//! - Record identifiers as assigned by the registry store
//! - Second-precision UTC timestamps in the registry's wire format
//!
//! Registry document types (metadata, endpoints, contacts, ...) live in
//! `oarr-model`, not here.

mod ids;
mod timestamp;

pub use ids::RecordId;
pub use timestamp::{Timestamp, FEED_FORMAT, WIRE_FORMAT};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}
