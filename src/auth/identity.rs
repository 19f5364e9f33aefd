//! # Identity Verification
//!
//! The capability that turns a bearer credential into a verified email.

use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Email attested for the current request's credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub email: String,
}

impl VerifiedIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Whether this identity owns a record whose owner field is `owner_email`
    pub fn owns(&self, owner_email: &str) -> bool {
        self.email == owner_email
    }
}

/// Maps a bearer credential to a verified identity or fails
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> AuthResult<VerifiedIdentity>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingCredential)?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}
