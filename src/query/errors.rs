//! # Query Errors

use thiserror::Error;

/// Result type for query building
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while translating filter parameters
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Substring filter text too large to compile into a matcher
    #[error("Filter {field} is too long")]
    FilterTooLong { field: &'static str },
}
