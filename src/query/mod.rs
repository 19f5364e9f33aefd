//! # Review Query Module
//!
//! Pure translation of review filter parameters into store queries.

pub mod builder;
pub mod errors;

pub use builder::{ReviewFilters, ReviewQuery, SortOrder, FEATURED_LIMIT};
pub use errors::{QueryError, QueryResult};
