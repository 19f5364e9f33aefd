//! # HTTP API
//!
//! axum binding of the coordinator operations. Bearer credentials are
//! verified by the `Authenticated` extractor before a handler runs, and
//! every failure is rendered as `{ "error", "message", "code" }`.

mod errors;
mod extract;
mod response;
mod routes;
mod server;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use extract::Authenticated;
pub use response::{DuplicateResponse, HealthResponse, MessageResponse, RegisterResponse};
pub use routes::{router, AppState, ROOT_MESSAGE};
pub use server::{cors_layer, HttpServer};
