//! # Coordinator
//!
//! Composes the user, review and favorite stores over one database handle.

use crate::store::{Database, FavoriteStore, ReviewStore, UserStore};

/// Entry point for every logical operation of the service
#[derive(Debug, Clone)]
pub struct Coordinator {
    db: Database,
    pub(super) users: UserStore,
    pub(super) reviews: ReviewStore,
    pub(super) favorites: FavoriteStore,
}

impl Coordinator {
    pub fn new(db: Database) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            reviews: ReviewStore::new(db.clone()),
            favorites: FavoriteStore::new(db.clone()),
            db,
        }
    }

    /// Underlying storage handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    pub fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }
}
