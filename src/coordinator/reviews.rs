//! Review operations, including the favorite cascade on delete.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::VerifiedIdentity;
use crate::query::{ReviewFilters, ReviewQuery};
use crate::store::reviews::fields;
use crate::store::{Document, Review, UpdateResult};

use super::errors::{ServiceError, ServiceResult};
use super::service::Coordinator;

/// Result of deleting a review and its favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDeletion {
    pub acknowledged: bool,
    pub deleted_count: u64,
    pub favorites_removed: u64,
}

impl Coordinator {
    /// Reviews matching the caller's filters
    pub fn list_reviews(&self, filters: &ReviewFilters) -> ServiceResult<Vec<Review>> {
        let query = ReviewQuery::build(filters)?;
        let reviews = self.reviews.list(&query.filter, &query.sort, query.limit)?;
        debug!(count = reviews.len(), "reviews listed");
        Ok(reviews)
    }

    /// The six highest-rated reviews
    pub fn featured_reviews(&self) -> ServiceResult<Vec<Review>> {
        let query = ReviewQuery::featured();
        Ok(self.reviews.list(&query.filter, &query.sort, query.limit)?)
    }

    pub fn get_review(&self, id: &str) -> ServiceResult<Review> {
        self.reviews
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Review {id} not found")))
    }

    /// Store a review owned by the verified identity
    pub fn create_review(
        &self,
        review: &Review,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<Review> {
        let owned = Review {
            reviewer_email: identity.email.clone(),
            ..review.clone()
        };

        let created = self.reviews.create(&owned)?;
        info!(review_id = ?created.id, owner = %identity.email, "review created");
        Ok(created)
    }

    /// Merge `patch` into a review owned by the verified identity.
    ///
    /// A `reviewerEmail` claimed in `patch` must match the verified identity,
    /// and so must the stored owner.
    pub fn update_review(
        &self,
        id: &str,
        patch: &Document,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<UpdateResult> {
        if let Some(claimed) = patch.get(fields::REVIEWER_EMAIL) {
            if claimed.as_str() != Some(identity.email.as_str()) {
                warn!(review_id = %id, caller = %identity.email, "update rejected: claimed owner mismatch");
                return Err(ServiceError::Forbidden(
                    "Forbidden: you can only update your own reviews".to_string(),
                ));
            }
        }

        let existing = self.get_review(id)?;
        if !identity.owns(&existing.reviewer_email) {
            warn!(review_id = %id, caller = %identity.email, "update rejected: not the owner");
            return Err(ServiceError::Forbidden(
                "Forbidden: you can only update your own reviews".to_string(),
            ));
        }

        let result = self.reviews.update(id, patch)?;
        info!(review_id = %id, modified = result.modified_count, "review updated");
        Ok(result)
    }

    /// Delete a review owned by the verified identity, removing its favorites
    /// first.
    ///
    /// Deleting an unknown id reports zero deletions. A failed favorite
    /// cleanup is logged and does not stop the review delete.
    ///
    /// When `id` resolves to no review there is no owner to check, and the
    /// cascade still removes every favorite keyed to `id`. Such favorites are
    /// dangling references that no listing can return, so any verified caller
    /// may clear them.
    pub fn delete_review(
        &self,
        id: &str,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<ReviewDeletion> {
        if let Some(existing) = self.reviews.get(id)? {
            if !identity.owns(&existing.reviewer_email) {
                warn!(review_id = %id, caller = %identity.email, "delete rejected: not the owner");
                return Err(ServiceError::Forbidden(
                    "Forbidden: you can only delete your own reviews".to_string(),
                ));
            }
        }

        let favorites_removed = match self.favorites.delete_many(id) {
            Ok(count) => count,
            Err(err) => {
                warn!(review_id = %id, error = %err, "favorite cascade failed");
                0
            }
        };

        let result = self.reviews.delete(id)?;
        info!(
            review_id = %id,
            deleted = result.deleted_count,
            favorites_removed,
            "review deleted"
        );

        Ok(ReviewDeletion {
            acknowledged: true,
            deleted_count: result.deleted_count,
            favorites_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Database, Favorite};
    use serde_json::json;

    fn setup() -> (Coordinator, VerifiedIdentity) {
        (
            Coordinator::new(Database::open("test")),
            VerifiedIdentity::new("a@x.com"),
        )
    }

    fn pho(coordinator: &Coordinator, identity: &VerifiedIdentity) -> String {
        coordinator
            .create_review(&Review::new("", "Pho Bo", "Pho 24", "Dhaka", 4.5), identity)
            .unwrap()
            .id
            .unwrap()
    }

    #[test]
    fn test_create_forces_owner() {
        let (coordinator, identity) = setup();
        let review = Review::new("someone@else.com", "Pho Bo", "Pho 24", "Dhaka", 4.5);

        let created = coordinator.create_review(&review, &identity).unwrap();
        assert_eq!(created.reviewer_email, "a@x.com");
    }

    #[test]
    fn test_get_unknown_review() {
        let (coordinator, _) = setup();
        assert!(matches!(
            coordinator.get_review("missing"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_by_non_owner_is_forbidden_and_unmodified() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);
        let intruder = VerifiedIdentity::new("b@x.com");

        let patch = json!({"rating": 1.0});
        let err = coordinator
            .update_review(&id, patch.as_object().unwrap(), &intruder)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let claimed = json!({"rating": 1.0, "reviewerEmail": "a@x.com"});
        let err = coordinator
            .update_review(&id, claimed.as_object().unwrap(), &intruder)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        assert_eq!(coordinator.get_review(&id).unwrap().rating, 4.5);
    }

    #[test]
    fn test_update_with_mismatched_claim_is_forbidden() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);

        let patch = json!({"rating": 2.0, "reviewerEmail": "b@x.com"});
        let err = coordinator
            .update_review(&id, patch.as_object().unwrap(), &owner)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn test_update_missing_review_is_not_found() {
        let (coordinator, owner) = setup();
        let patch = json!({"rating": 2.0, "reviewerEmail": "a@x.com"});
        let err = coordinator
            .update_review(
                "6f1c2a3e-0000-4000-8000-000000000000",
                patch.as_object().unwrap(),
                &owner,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_owner_update_merges() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);

        let patch = json!({"rating": 5.0, "reviewerEmail": "a@x.com"});
        let result = coordinator
            .update_review(&id, patch.as_object().unwrap(), &owner)
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 1);

        let review = coordinator.get_review(&id).unwrap();
        assert_eq!(review.rating, 5.0);
        assert_eq!(review.food_name, "Pho Bo");
    }

    #[test]
    fn test_delete_cascades_favorites() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);
        let other = pho(&coordinator, &owner);
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            coordinator.favorites.insert(&Favorite::new(&id, email)).unwrap();
        }
        coordinator.favorites.insert(&Favorite::new(&other, "a@x.com")).unwrap();

        let deletion = coordinator.delete_review(&id, &owner).unwrap();
        assert_eq!(deletion.deleted_count, 1);
        assert_eq!(deletion.favorites_removed, 3);

        assert!(coordinator.reviews.get(&id).unwrap().is_none());
        assert!(coordinator.favorites.find_one(&other, "a@x.com").unwrap().is_some());
    }

    #[test]
    fn test_delete_without_favorites() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);

        let deletion = coordinator.delete_review(&id, &owner).unwrap();
        assert_eq!(deletion.deleted_count, 1);
        assert_eq!(deletion.favorites_removed, 0);
    }

    #[test]
    fn test_delete_unknown_review_is_zero() {
        let (coordinator, owner) = setup();
        let deletion = coordinator.delete_review("missing", &owner).unwrap();
        assert_eq!(deletion.deleted_count, 0);
    }

    #[test]
    fn test_delete_unknown_review_clears_dangling_favorites() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);
        coordinator.favorites.insert(&Favorite::new(&id, "b@x.com")).unwrap();
        coordinator.reviews.delete(&id).unwrap();

        let deletion = coordinator
            .delete_review(&id, &VerifiedIdentity::new("c@x.com"))
            .unwrap();
        assert_eq!(deletion.deleted_count, 0);
        assert_eq!(deletion.favorites_removed, 1);
    }

    #[test]
    fn test_delete_by_non_owner_is_forbidden() {
        let (coordinator, owner) = setup();
        let id = pho(&coordinator, &owner);
        coordinator.favorites.insert(&Favorite::new(&id, "a@x.com")).unwrap();

        let err = coordinator
            .delete_review(&id, &VerifiedIdentity::new("b@x.com"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(coordinator.reviews.get(&id).unwrap().is_some());
        assert!(coordinator.favorites.find_one(&id, "a@x.com").unwrap().is_some());
    }
}
