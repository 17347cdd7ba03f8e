//! betpool-server entry point.
//!
//! Starts the Axum HTTP server backed by a PostgreSQL store.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use betpool_server::api;
use betpool_server::api::auth::TokenVerifier;
use betpool_server::app_state::AppState;
use betpool_server::config::ServerConfig;
use betpool_server::persistence::PostgresStore;
use betpool_server::service::PoolService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting betpool-server");

    // Connect to the store and bring the schema up to date
    let pg = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pg).await?;

    // Build service layer
    let store = Arc::new(PostgresStore::new(pg));
    let pool_service = Arc::new(PoolService::new(store));

    // Build application state
    let app_state = AppState {
        pool_service,
        token_verifier: Arc::new(TokenVerifier::new(&config.jwt_secret)),
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
