//! # Consistency Coordinator
//!
//! Enforces the relationship rules between reviews and favorites on top of
//! the stores:
//!
//! - ownership: mutations and favorite reads act only for the verified identity
//! - dedup: at most one favorite per (review, owner)
//! - cascade: deleting a review first removes its favorites (best effort)
//! - dangling references: favorites of deleted reviews are skipped on read

mod errors;
mod favorites;
mod reviews;
mod service;
mod users;

pub use errors::{ServiceError, ServiceResult};
pub use favorites::FavoriteStatus;
pub use reviews::ReviewDeletion;
pub use service::Coordinator;
