//! System endpoints: health check plus the public user/guess counters.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::CountResponse;
use crate::app_state::AppState;
use crate::error::ApiError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /users/count` — Number of registered users, public.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/users/count",
    tag = "System",
    summary = "Count users",
    responses(
        (status = 200, description = "User count", body = CountResponse),
    )
)]
pub async fn count_users(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.pool_service.count_users().await?;
    Ok(Json(CountResponse { count }))
}

/// `GET /guesses/count` — Number of submitted guesses, public.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/guesses/count",
    tag = "System",
    summary = "Count guesses",
    responses(
        (status = 200, description = "Guess count", body = CountResponse),
    )
)]
pub async fn count_guesses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.pool_service.count_guesses().await?;
    Ok(Json(CountResponse { count }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/users/count", get(count_users))
        .route("/guesses/count", get(count_guesses))
}
