//! # Routes
//!
//! Binds each HTTP verb and path to one coordinator operation.
//!
//! | Method | Path                  | Auth   |
//! |--------|-----------------------|--------|
//! | POST   | `/users`              | none   |
//! | GET    | `/reviews`            | none   |
//! | GET    | `/featured-reviews`   | none   |
//! | GET    | `/reviews/:id`        | none   |
//! | POST   | `/reviews`            | bearer |
//! | PATCH  | `/reviews/:id`        | bearer |
//! | DELETE | `/reviews/:id`        | bearer |
//! | GET    | `/favorites`          | bearer |
//! | GET    | `/favorites/check`    | bearer |
//! | POST   | `/favorites`          | bearer |
//! | DELETE | `/favorites/:reviewId`| bearer |

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::IdentityVerifier;
use crate::coordinator::{Coordinator, FavoriteStatus, ReviewDeletion};
use crate::query::ReviewFilters;
use crate::store::{DeleteResult, Document, Favorite, FavoriteInsert, Review, UpdateResult, User};

use super::errors::{ApiError, ApiResult};
use super::extract::Authenticated;
use super::response::{DuplicateResponse, HealthResponse, RegisterResponse};

/// Liveness text served at `/`
pub const ROOT_MESSAGE: &str = "Local Food Lovers server side is running!";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(coordinator: Coordinator, verifier: impl IdentityVerifier + 'static) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            verifier: Arc::new(verifier),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/users", post(register_handler))
        .route("/reviews", get(list_reviews_handler).post(create_review_handler))
        .route("/featured-reviews", get(featured_reviews_handler))
        .route(
            "/reviews/:id",
            get(get_review_handler)
                .patch(update_review_handler)
                .delete(delete_review_handler),
        )
        .route(
            "/favorites",
            get(list_favorites_handler).post(create_favorite_handler),
        )
        .route("/favorites/check", get(favorite_status_handler))
        .route("/favorites/:review_id", delete(remove_favorite_handler))
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListParams {
    pub favorite_user_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheckParams {
    pub review_id: Option<String>,
}

/// Decode a JSON body into a record, reporting shape errors as 400
fn decode<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> ApiResult<T> {
    let Json(value) = body?;
    serde_json::from_value(value).map_err(|err| ApiError::BadRequest(err.to_string()))
}

// ==================
// Liveness
// ==================

async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let (status, body) = if state.coordinator.database().ping().is_ok() {
        (StatusCode::OK, HealthResponse { status: "ok", database: "open" })
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse { status: "degraded", database: "closed" },
        )
    };
    (status, Json(body)).into_response()
}

// ==================
// Users
// ==================

async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let user: User = decode(body)?;
    let response = RegisterResponse::from(state.coordinator.register_user(&user)?);

    let status = match response {
        RegisterResponse::Existing(_) => StatusCode::OK,
        RegisterResponse::Created(_) => StatusCode::CREATED,
    };
    Ok((status, Json(response)).into_response())
}

// ==================
// Reviews
// ==================

async fn list_reviews_handler(
    State(state): State<AppState>,
    filters: Result<Query<ReviewFilters>, QueryRejection>,
) -> ApiResult<Json<Vec<Review>>> {
    let Query(filters) = filters?;
    Ok(Json(state.coordinator.list_reviews(&filters)?))
}

async fn featured_reviews_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.coordinator.featured_reviews()?))
}

async fn get_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.coordinator.get_review(&id)?))
}

async fn create_review_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let review: Review = decode(body)?;
    let created = state.coordinator.create_review(&review, &identity)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_review_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<UpdateResult>> {
    let patch: Document = decode(body)?;
    Ok(Json(state.coordinator.update_review(&id, &patch, &identity)?))
}

async fn delete_review_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<ReviewDeletion>> {
    Ok(Json(state.coordinator.delete_review(&id, &identity)?))
}

// ==================
// Favorites
// ==================

async fn list_favorites_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    params: Result<Query<FavoriteListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Review>>> {
    let Query(params) = params?;
    let reviews = state
        .coordinator
        .list_favorites(params.favorite_user_email.as_deref(), &identity)?;
    Ok(Json(reviews))
}

async fn favorite_status_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    params: Result<Query<FavoriteCheckParams>, QueryRejection>,
) -> ApiResult<Json<FavoriteStatus>> {
    let Query(params) = params?;
    let status = state
        .coordinator
        .favorite_status(params.review_id.as_deref(), &identity)?;
    Ok(Json(status))
}

async fn create_favorite_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let favorite: Favorite = decode(body)?;

    let response = match state.coordinator.create_favorite(&favorite, &identity)? {
        FavoriteInsert::Created(created) => (StatusCode::CREATED, Json(created)).into_response(),
        FavoriteInsert::Duplicate(existing) => {
            (StatusCode::OK, Json(DuplicateResponse::new(existing))).into_response()
        }
    };
    Ok(response)
}

async fn remove_favorite_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(review_id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    Ok(Json(state.coordinator.remove_favorite(&review_id, &identity)?))
}
