//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Rejected at startup while composing the route table
    #[error("Route conflict: {0}")]
    RouteConflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The chat-completion service answered with something unusable
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned for every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HttpClient(_) | AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::RouteConflict(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
