//! # Response Formatting
//!
//! Response bodies for the HTTP API.

use serde::Serialize;

use crate::store::{Favorite, InsertOneResult, Registration};

/// Plain message body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `POST /users`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Existing(MessageResponse),
    Created(InsertOneResult),
}

impl From<Registration> for RegisterResponse {
    fn from(registration: Registration) -> Self {
        match registration {
            Registration::Existing(_) => {
                RegisterResponse::Existing(MessageResponse::new("User already exists."))
            }
            Registration::Created(user) => RegisterResponse::Created(InsertOneResult {
                acknowledged: true,
                inserted_id: user.id.unwrap_or_default(),
            }),
        }
    }
}

/// Body of `POST /favorites` when the pair already exists
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateResponse {
    pub duplicate: bool,
    pub message: String,
    pub favorite: Favorite,
}

impl DuplicateResponse {
    pub fn new(favorite: Favorite) -> Self {
        Self {
            duplicate: true,
            message: "Review already in favorites".to_string(),
            favorite,
        }
    }
}

/// Health check body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::User;

    #[test]
    fn test_register_response_serialization() {
        let existing = RegisterResponse::from(Registration::Existing(User::new("a@x.com")));
        let json = serde_json::to_value(&existing).unwrap();
        assert_eq!(json["message"], "User already exists.");

        let mut user = User::new("a@x.com");
        user.id = Some("abc".to_string());
        let created = RegisterResponse::from(Registration::Created(user));
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["insertedId"], "abc");
        assert_eq!(json["acknowledged"], true);
    }

    #[test]
    fn test_duplicate_response_serialization() {
        let response = DuplicateResponse::new(Favorite::new("r1", "a@x.com"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["duplicate"], true);
        assert_eq!(json["favorite"]["reviewId"], "r1");
    }
}
