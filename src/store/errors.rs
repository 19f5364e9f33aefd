//! # Store Errors
//!
//! Error types for the document store.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store handle is closed or a collection lock is poisoned
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A document could not be converted to or from its typed record
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl StoreError {
    /// Whether the caller sent data the store could not accept
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidDocument(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidDocument(err.to_string())
    }
}
