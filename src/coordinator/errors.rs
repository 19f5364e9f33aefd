//! # Coordinator Errors

use thiserror::Error;

use crate::query::QueryError;
use crate::store::StoreError;

/// Result type for coordinator operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while enforcing the review/favorite rules
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Verified identity does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Identifier does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Missing or unusable request parameter
    #[error("{0}")]
    BadRequest(String),

    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}
