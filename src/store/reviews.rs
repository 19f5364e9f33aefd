//! # Review Store
//!
//! Typed access to the `reviews` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{
    from_document, id_filter, to_document, DeleteResult, Document, UpdateResult, ID_FIELD,
};
use super::database::Database;
use super::errors::StoreResult;
use super::filter::{Filter, SortSpec};

/// Wire names of the review fields used in queries
pub mod fields {
    pub const REVIEWER_EMAIL: &str = "reviewerEmail";
    pub const FOOD_NAME: &str = "foodName";
    pub const RESTAURANT_NAME: &str = "restaurantName";
    pub const LOCATION: &str = "location";
    pub const RATING: &str = "rating";
    pub const DATE: &str = "date";
}

/// Review record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Store-assigned identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner of the review
    #[serde(default)]
    pub reviewer_email: String,

    #[serde(default)]
    pub food_name: String,

    #[serde(default)]
    pub restaurant_name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub rating: f64,

    /// Defaults to the creation time
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,

    /// Free-form fields (review text, image URL, reviewer name, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    pub fn new(
        reviewer_email: impl Into<String>,
        food_name: impl Into<String>,
        restaurant_name: impl Into<String>,
        location: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            id: None,
            reviewer_email: reviewer_email.into(),
            food_name: food_name.into(),
            restaurant_name: restaurant_name.into(),
            location: location.into(),
            rating,
            date: Utc::now(),
            extra: Map::new(),
        }
    }
}

/// Typed access to the `reviews` collection
#[derive(Debug, Clone)]
pub struct ReviewStore {
    db: Database,
}

impl ReviewStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All reviews matching `filter`, ordered by `sort`, truncated to `limit`
    pub fn list(
        &self,
        filter: &Filter,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Review>> {
        self.db
            .reviews()?
            .find(filter, Some(sort), limit)?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Point lookup. Malformed identifiers resolve to `None`.
    pub fn get(&self, id: &str) -> StoreResult<Option<Review>> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        self.db
            .reviews()?
            .find_one(&filter)?
            .map(from_document)
            .transpose()
    }

    /// Insert a review and return it with its assigned identifier
    pub fn create(&self, review: &Review) -> StoreResult<Review> {
        let mut doc = to_document(review)?;
        doc.remove(ID_FIELD);

        let result = self.db.reviews()?.insert_one(doc)?;

        Ok(Review {
            id: Some(result.inserted_id),
            ..review.clone()
        })
    }

    /// Merge `patch` into the stored review.
    ///
    /// The identifier and owner are never overwritten. The merged document must
    /// still be a valid review, otherwise nothing is written.
    pub fn update(&self, id: &str, patch: &Document) -> StoreResult<UpdateResult> {
        let unmatched = UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
        };
        let Some(filter) = id_filter(id) else {
            return Ok(unmatched);
        };

        let mut set = patch.clone();
        set.remove(ID_FIELD);
        set.remove(fields::REVIEWER_EMAIL);

        let reviews = self.db.reviews()?;
        let Some(mut merged) = reviews.find_one(&filter)? else {
            return Ok(unmatched);
        };
        merged.extend(set.clone());
        from_document::<Review>(merged)?;

        reviews.update_one(&filter, &set)
    }

    /// Remove a review. Deleting an unknown id removes nothing.
    pub fn delete(&self, id: &str) -> StoreResult<DeleteResult> {
        match id_filter(id) {
            Some(filter) => self.db.reviews()?.delete_one(&filter),
            None => Ok(DeleteResult::new(0)),
        }
    }
}
