//! Error types for the reconciliation layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors a record store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never completed (connection, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered but refused the request.
    #[error("store rejected request: {0}")]
    Rejected(String),

    /// Writes need credentials that were not configured.
    #[error("authentication required")]
    AuthRequired,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that abort the reconciliation of one entity.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Lookup or save against the store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
