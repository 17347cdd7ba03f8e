//! REST API layer: auth extractors, route handlers, DTOs, and router
//! composition.
//!
//! Endpoints are mounted at the root paths the clients consume.

pub mod auth;
pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}
