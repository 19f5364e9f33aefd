//! # Database Handle
//!
//! Explicit storage handle shared by the typed stores. It is opened once at
//! process start and closed at shutdown; a closed handle refuses every
//! operation with `StoreError::Unavailable`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use super::collection::Collection;
use super::errors::{StoreError, StoreResult};

pub const USERS: &str = "users";
pub const REVIEWS: &str = "reviews";
pub const FAVORITES: &str = "favorites";

#[derive(Debug)]
struct DatabaseInner {
    name: String,
    open: AtomicBool,
    users: Collection,
    reviews: Collection,
    favorites: Collection,
}

/// Cloneable handle to the document store
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Open a new, empty database
    pub fn open(name: impl Into<String>) -> Self {
        let name = name.into();
        info!(database = %name, "database opened");

        Self {
            inner: Arc::new(DatabaseInner {
                name,
                open: AtomicBool::new(true),
                users: Collection::new(USERS),
                reviews: Collection::new(REVIEWS),
                favorites: Collection::new(FAVORITES),
            }),
        }
    }

    /// Close the handle. Every clone observes the close.
    pub fn close(&self) {
        if self.inner.open.swap(false, Ordering::SeqCst) {
            info!(database = %self.inner.name, "database closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Liveness probe
    pub fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "database {} is closed",
                self.inner.name
            )))
        }
    }

    pub fn users(&self) -> StoreResult<&Collection> {
        self.ensure_open()?;
        Ok(&self.inner.users)
    }

    pub fn reviews(&self) -> StoreResult<&Collection> {
        self.ensure_open()?;
        Ok(&self.inner.reviews)
    }

    pub fn favorites(&self) -> StoreResult<&Collection> {
        self.ensure_open()?;
        Ok(&self.inner.favorites)
    }
}
