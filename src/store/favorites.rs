//! # Favorite Store
//!
//! Typed access to the `favorites` collection. A favorite references a review
//! by id; the reference is not enforced, so it may dangle after the review is
//! deleted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{from_document, to_document, DeleteResult, InsertOutcome, ID_FIELD};
use super::database::Database;
use super::errors::StoreResult;
use super::filter::{Filter, FilterExpr};

/// Wire names of the favorite fields used in queries
pub mod fields {
    pub const REVIEW_ID: &str = "reviewId";
    pub const FAVORITE_USER_EMAIL: &str = "favoriteUserEmail";
}

/// Favorite marker linking a user to a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Store-assigned identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Referenced review
    #[serde(default)]
    pub review_id: String,

    /// Owner of the favorite
    #[serde(default)]
    pub favorite_user_email: String,

    /// Free-form fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Favorite {
    pub fn new(review_id: impl Into<String>, favorite_user_email: impl Into<String>) -> Self {
        Self {
            id: None,
            review_id: review_id.into(),
            favorite_user_email: favorite_user_email.into(),
            extra: Map::new(),
        }
    }
}

/// Outcome of a deduplicated insert
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteInsert {
    Created(Favorite),

    /// The (review, owner) pair was already favorited; nothing was stored
    Duplicate(Favorite),
}

/// Typed access to the `favorites` collection
#[derive(Debug, Clone)]
pub struct FavoriteStore {
    db: Database,
}

impl FavoriteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Filter selecting every favorite of one review
    pub fn review_filter(review_id: &str) -> Filter {
        FilterExpr::eq(fields::REVIEW_ID, review_id).into()
    }

    /// Filter selecting every favorite of one user
    pub fn owner_filter(owner_email: &str) -> Filter {
        FilterExpr::eq(fields::FAVORITE_USER_EMAIL, owner_email).into()
    }

    fn pair_filter(review_id: &str, owner_email: &str) -> Filter {
        Self::review_filter(review_id).and(Self::owner_filter(owner_email))
    }

    pub fn list_by_filter(&self, filter: &Filter) -> StoreResult<Vec<Favorite>> {
        self.db
            .favorites()?
            .find(filter, None, None)?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub fn find_one(&self, review_id: &str, owner_email: &str) -> StoreResult<Option<Favorite>> {
        self.db
            .favorites()?
            .find_one(&Self::pair_filter(review_id, owner_email))?
            .map(from_document)
            .transpose()
    }

    /// Unconditional insert
    pub fn insert(&self, favorite: &Favorite) -> StoreResult<Favorite> {
        let mut doc = to_document(favorite)?;
        doc.remove(ID_FIELD);

        let result = self.db.favorites()?.insert_one(doc)?;

        Ok(Favorite {
            id: Some(result.inserted_id),
            ..favorite.clone()
        })
    }

    /// Insert unless the (review, owner) pair already exists.
    ///
    /// Check and insert run under the collection write lock, so concurrent
    /// callers cannot both store the same pair.
    pub fn insert_unique(&self, favorite: &Favorite) -> StoreResult<FavoriteInsert> {
        let mut doc = to_document(favorite)?;
        doc.remove(ID_FIELD);

        let guard = Self::pair_filter(&favorite.review_id, &favorite.favorite_user_email);
        match self.db.favorites()?.insert_unless(&guard, doc)? {
            InsertOutcome::Inserted(created) => Ok(FavoriteInsert::Created(from_document(created)?)),
            InsertOutcome::Existing(existing) => {
                Ok(FavoriteInsert::Duplicate(from_document(existing)?))
            }
        }
    }

    /// Remove every favorite of a review, returning how many were removed
    pub fn delete_many(&self, review_id: &str) -> StoreResult<u64> {
        Ok(self
            .db
            .favorites()?
            .delete_many(&Self::review_filter(review_id))?
            .deleted_count)
    }

    /// Remove at most one favorite of a review, optionally restricted to one owner
    pub fn delete_one(&self, review_id: &str, owner_email: Option<&str>) -> StoreResult<DeleteResult> {
        let filter = match owner_email {
            Some(owner) => Self::pair_filter(review_id, owner),
            None => Self::review_filter(review_id),
        };
        self.db.favorites()?.delete_one(&filter)
    }
}
