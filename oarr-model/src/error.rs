//! Model error types.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the document model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown metadata field: {0}")]
    UnknownField(String),

    #[error("field {field} expects a {expected} value")]
    FieldShape {
        field: &'static str,
        expected: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
