//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::api::auth::TokenVerifier;
use crate::service::PoolService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pool lifecycle service for all business logic.
    pub pool_service: Arc<PoolService>,
    /// Bearer-token verifier backing the auth extractors.
    pub token_verifier: Arc<TokenVerifier>,
}
