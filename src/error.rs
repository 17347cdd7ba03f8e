//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to an HTTP status code and the `{"message": ...}` JSON body the
//! clients consume.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::StoreError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed before any store access.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No pool matches the supplied join code.
    #[error("pool not found")]
    PoolNotFound,

    /// The caller already participates in the pool.
    #[error("you already joined this pool")]
    AlreadyJoined,

    /// A protected route was called without a valid bearer token.
    #[error("authentication required")]
    AuthRequired,

    /// Store failure.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Unexpected server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::PoolNotFound | Self::AlreadyJoined => {
                StatusCode::BAD_REQUEST
            }
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures are logged with full detail and reported to
        // the client with a generic message only.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let mut response = axum::Json(ErrorResponse { message }).into_response();
        *response.status_mut() = status;
        response
    }
}
