//! Request extractors.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::auth::{parse_bearer, AuthError, VerifiedIdentity};

use super::errors::ApiError;
use super::routes::AppState;

/// Verified identity of the caller, taken from `Authorization: Bearer <token>`.
///
/// Rejects with 401 before the handler runs when the credential is absent,
/// malformed or fails verification.
#[derive(Debug, Clone)]
pub struct Authenticated(pub VerifiedIdentity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedCredential)?),
            None => None,
        };

        let token = parse_bearer(header)?;
        let identity = state.verifier.verify(token).map_err(|err| {
            debug!(error = %err, "credential rejected");
            err
        })?;

        Ok(Authenticated(identity))
    }
}
