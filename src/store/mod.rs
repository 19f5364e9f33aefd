//! # Document Store
//!
//! In-process document storage for users, reviews and favorites.
//!
//! A single [`Database`] handle owns the three collections. The typed stores
//! ([`UserStore`], [`ReviewStore`], [`FavoriteStore`]) each hold a clone of the
//! handle and translate between records and JSON documents.

pub mod collection;
pub mod database;
pub mod errors;
pub mod favorites;
pub mod filter;
pub mod reviews;
pub mod users;

pub use collection::{DeleteResult, Document, InsertOneResult, UpdateResult};
pub use database::Database;
pub use errors::{StoreError, StoreResult};
pub use favorites::{Favorite, FavoriteInsert, FavoriteStore};
pub use filter::{Filter, FilterExpr, SortDirection, SortSpec};
pub use reviews::{Review, ReviewStore};
pub use users::{Registration, User, UserStore};
