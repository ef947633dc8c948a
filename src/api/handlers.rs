//! HTTP request handlers

use crate::api::models::PingResponse;
use crate::error::AppError;
use axum::{http::Uri, Json};
use tracing::debug;

/// Healthcheck
///
/// Returns pong if the server is alive
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Server is alive", body = PingResponse)
    )
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::pong())
}

/// Fallback for paths no route matched
pub async fn not_found(uri: Uri) -> AppError {
    debug!(path = %uri.path(), "No route matched");
    AppError::NotFound("Not Found".to_string())
}
