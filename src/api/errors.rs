//! # API Errors
//!
//! Maps every failure to a JSON body `{ "error", "message", "code" }`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::coordinator::ServiceError;
use crate::store::StoreError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-facing errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing, malformed or unverifiable credential
    #[error("{0}")]
    Unauthorized(#[from] AuthError),

    /// Verified identity does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Identifier does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Missing parameter or malformed body
    #[error("{0}")]
    BadRequest(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage unreachable
    #[error("Storage unavailable")]
    StoreUnavailable(String),

    /// Anything else
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(auth_err) => StatusCode::from_u16(auth_err.status_code())
                .unwrap_or(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error kind reported to clients
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(AuthError::TokenGenerationFailed) => "Internal",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::StoreUnavailable(_) => "StoreUnavailable",
            ApiError::Internal(_) => "Internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidDocument(msg) => ApiError::BadRequest(msg),
            StoreError::Unavailable(msg) => ApiError::StoreUnavailable(msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::BadRequest(msg) => ApiError::BadRequest(msg),
            ServiceError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            // Details go to the log only.
            match &self {
                ApiError::StoreUnavailable(detail) | ApiError::Internal(detail) => {
                    error!(kind = self.kind(), detail = %detail, "request failed")
                }
                other => error!(kind = other.kind(), "request failed"),
            }
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
