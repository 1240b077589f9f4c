//! Registry client error types.

use oarr_reconcile::StoreError;
use thiserror::Error;

/// Result type for registry client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the registry API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("authentication required")]
    AuthRequired,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired => StoreError::AuthRequired,
            ClientError::Serialization(e) => StoreError::Serialization(e),
            ClientError::Api(msg) => StoreError::Rejected(msg),
            ClientError::Http(e) if e.status().is_some() => StoreError::Rejected(e.to_string()),
            other => StoreError::Transport(other.to_string()),
        }
    }
}
