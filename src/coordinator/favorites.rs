//! Favorite operations.
//!
//! Every favorite operation runs on behalf of a verified identity and only
//! ever touches that identity's favorites.

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::VerifiedIdentity;
use crate::store::favorites::FavoriteStore;
use crate::store::{DeleteResult, Favorite, FavoriteInsert, Review};

use super::errors::{ServiceError, ServiceResult};
use super::service::Coordinator;

/// Presence of one (review, owner) favorite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteStatus {
    pub exists: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorite>,
}

impl Coordinator {
    /// Reviews favorited by the verified identity.
    ///
    /// A `favorite_user_email` filter naming anyone else is forbidden; an
    /// absent filter means the caller. Favorites whose review no longer
    /// exists are dropped.
    pub fn list_favorites(
        &self,
        favorite_user_email: Option<&str>,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<Vec<Review>> {
        let owner = match favorite_user_email.filter(|e| !e.trim().is_empty()) {
            Some(requested) if !identity.owns(requested) => {
                return Err(ServiceError::Forbidden(
                    "Forbidden: you can only view your own favorites".to_string(),
                ));
            }
            _ => identity.email.as_str(),
        };

        let favorites = self
            .favorites
            .list_by_filter(&FavoriteStore::owner_filter(owner))?;

        let mut reviews = Vec::with_capacity(favorites.len());
        for favorite in &favorites {
            match self.reviews.get(&favorite.review_id)? {
                Some(review) => reviews.push(review),
                None => debug!(review_id = %favorite.review_id, "dropping dangling favorite"),
            }
        }

        Ok(reviews)
    }

    /// Whether the verified identity has favorited `review_id`
    pub fn favorite_status(
        &self,
        review_id: Option<&str>,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<FavoriteStatus> {
        let review_id = required_review_id(review_id)?;
        let favorite = self.favorites.find_one(review_id, &identity.email)?;

        Ok(FavoriteStatus {
            exists: favorite.is_some(),
            favorite,
        })
    }

    /// Favorite a review for the verified identity, at most once
    pub fn create_favorite(
        &self,
        favorite: &Favorite,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<FavoriteInsert> {
        let review_id = required_review_id(Some(favorite.review_id.as_str()))?;

        let owned = Favorite {
            id: None,
            review_id: review_id.to_string(),
            favorite_user_email: identity.email.clone(),
            ..favorite.clone()
        };

        let outcome = self.favorites.insert_unique(&owned)?;
        match &outcome {
            FavoriteInsert::Created(created) => {
                info!(review_id = %created.review_id, owner = %identity.email, "favorite created")
            }
            FavoriteInsert::Duplicate(_) => {
                debug!(review_id = %owned.review_id, owner = %identity.email, "favorite already exists")
            }
        }
        Ok(outcome)
    }

    /// Remove the verified identity's favorite of `review_id`
    pub fn remove_favorite(
        &self,
        review_id: &str,
        identity: &VerifiedIdentity,
    ) -> ServiceResult<DeleteResult> {
        let review_id = required_review_id(Some(review_id))?;
        let result = self.favorites.delete_one(review_id, Some(&identity.email))?;
        info!(review_id = %review_id, owner = %identity.email, deleted = result.deleted_count, "favorite removed");
        Ok(result)
    }
}

fn required_review_id(review_id: Option<&str>) -> ServiceResult<&str> {
    review_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServiceError::BadRequest("reviewId is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;

    fn setup() -> (Coordinator, VerifiedIdentity) {
        (
            Coordinator::new(Database::open("test")),
            VerifiedIdentity::new("a@x.com"),
        )
    }

    fn review(coordinator: &Coordinator, identity: &VerifiedIdentity, food: &str) -> String {
        coordinator
            .create_review(&Review::new("", food, "Diner", "Dhaka", 4.0), identity)
            .unwrap()
            .id
            .unwrap()
    }

    #[test]
    fn test_create_favorite_dedup() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");

        let first = coordinator
            .create_favorite(&Favorite::new(&id, ""), &identity)
            .unwrap();
        let FavoriteInsert::Created(created) = first else {
            panic!("expected a created favorite");
        };
        assert_eq!(created.favorite_user_email, "a@x.com");

        let second = coordinator
            .create_favorite(&Favorite::new(&id, "someone@else.com"), &identity)
            .unwrap();
        assert!(matches!(second, FavoriteInsert::Duplicate(_)));

        let stored = coordinator
            .favorites
            .list_by_filter(&FavoriteStore::review_filter(&id))
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_create_favorite_requires_review_id() {
        let (coordinator, identity) = setup();
        let err = coordinator
            .create_favorite(&Favorite::new(" ", ""), &identity)
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[test]
    fn test_padded_review_id_is_stored_trimmed() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");
        let padded = format!(" {id} ");

        let FavoriteInsert::Created(created) = coordinator
            .create_favorite(&Favorite::new(&padded, ""), &identity)
            .unwrap()
        else {
            panic!("expected a created favorite");
        };
        assert_eq!(created.review_id, id);

        assert!(matches!(
            coordinator
                .create_favorite(&Favorite::new(&id, ""), &identity)
                .unwrap(),
            FavoriteInsert::Duplicate(_)
        ));
        assert!(coordinator.favorite_status(Some(&padded), &identity).unwrap().exists);

        let deletion = coordinator.delete_review(&id, &identity).unwrap();
        assert_eq!(deletion.favorites_removed, 1);
    }

    #[test]
    fn test_padded_review_id_can_be_unfavorited() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");
        let padded = format!(" {id} ");
        coordinator
            .create_favorite(&Favorite::new(&padded, ""), &identity)
            .unwrap();

        let result = coordinator.remove_favorite(&padded, &identity).unwrap();
        assert_eq!(result.deleted_count, 1);
        assert!(!coordinator.favorite_status(Some(&id), &identity).unwrap().exists);
    }

    #[test]
    fn test_favorite_status() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");

        let before = coordinator.favorite_status(Some(&id), &identity).unwrap();
        assert!(!before.exists);
        assert!(before.favorite.is_none());

        coordinator
            .create_favorite(&Favorite::new(&id, ""), &identity)
            .unwrap();

        let after = coordinator.favorite_status(Some(&id), &identity).unwrap();
        assert!(after.exists);

        let other = coordinator
            .favorite_status(Some(&id), &VerifiedIdentity::new("b@x.com"))
            .unwrap();
        assert!(!other.exists);
    }

    #[test]
    fn test_favorite_status_requires_review_id() {
        let (coordinator, identity) = setup();
        assert!(matches!(
            coordinator.favorite_status(None, &identity),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn test_list_favorites_resolves_reviews() {
        let (coordinator, identity) = setup();
        let pho = review(&coordinator, &identity, "Pho");
        let ramen = review(&coordinator, &identity, "Ramen");
        review(&coordinator, &identity, "Sushi");

        for id in [&pho, &ramen] {
            coordinator
                .create_favorite(&Favorite::new(id, ""), &identity)
                .unwrap();
        }

        let reviews = coordinator
            .list_favorites(Some("a@x.com"), &identity)
            .unwrap();
        let names: Vec<_> = reviews.iter().map(|r| r.food_name.as_str()).collect();
        assert_eq!(names, vec!["Pho", "Ramen"]);

        let implicit = coordinator.list_favorites(None, &identity).unwrap();
        assert_eq!(implicit.len(), 2);
    }

    #[test]
    fn test_list_other_users_favorites_is_forbidden() {
        let (coordinator, identity) = setup();
        let err = coordinator
            .list_favorites(Some("b@x.com"), &identity)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn test_list_favorites_without_filter_is_scoped_to_caller() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");
        coordinator
            .create_favorite(&Favorite::new(&id, ""), &VerifiedIdentity::new("b@x.com"))
            .unwrap();

        assert!(coordinator.list_favorites(None, &identity).unwrap().is_empty());
    }

    #[test]
    fn test_dangling_favorites_are_dropped() {
        let (coordinator, identity) = setup();
        let id = review(&coordinator, &identity, "Pho");
        coordinator
            .favorites
            .insert(&Favorite::new("6f1c2a3e-0000-4000-8000-000000000000", "a@x.com"))
            .unwrap();
        coordinator
            .create_favorite(&Favorite::new(&id, ""), &identity)
            .unwrap();

        let reviews = coordinator.list_favorites(None, &identity).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_remove_favorite_only_touches_caller() {
        let (coordinator, identity) = setup();
        let other = VerifiedIdentity::new("b@x.com");
        let id = review(&coordinator, &identity, "Pho");
        coordinator.create_favorite(&Favorite::new(&id, ""), &identity).unwrap();
        coordinator.create_favorite(&Favorite::new(&id, ""), &other).unwrap();

        let result = coordinator.remove_favorite(&id, &identity).unwrap();
        assert_eq!(result.deleted_count, 1);
        assert!(!coordinator.favorite_status(Some(&id), &identity).unwrap().exists);
        assert!(coordinator.favorite_status(Some(&id), &other).unwrap().exists);

        let again = coordinator.remove_favorite(&id, &identity).unwrap();
        assert_eq!(again.deleted_count, 0);
    }
}
