//! Pool endpoints: counter, create, join, list, detail.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::{AuthUser, MaybeAuthUser};
use crate::api::dto::{
    CountResponse, CreatePoolRequest, CreatePoolResponse, JoinPoolRequest, PoolDetailResponse,
    PoolListResponse,
};
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ApiError, ErrorResponse};

/// `GET /pools/count` — Number of pools, public.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/pools/count",
    tag = "Pools",
    summary = "Count pools",
    responses(
        (status = 200, description = "Pool count", body = CountResponse),
    )
)]
pub async fn count_pools(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.pool_service.count_pools().await?;
    Ok(Json(CountResponse { count }))
}

/// `POST /pools` — Create a pool; works with or without authentication.
///
/// # Errors
///
/// Returns [`ApiError`] on an invalid title or store failure.
#[utoipa::path(
    post,
    path = "/pools",
    tag = "Pools",
    summary = "Create a pool",
    description = "Creates a pool and returns its join code. An authenticated caller becomes owner and first participant; an anonymous caller gets an ownerless pool whose ownership the first authenticated joiner claims.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponse),
        (status = 400, description = "Invalid title", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.pool_service.create_pool(&req.title, caller).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePoolResponse {
            code: code.to_string(),
        }),
    ))
}

/// `POST /pools/join` — Join a pool by code.
///
/// # Errors
///
/// Returns [`ApiError`] when the code is unknown, the caller already
/// joined, or the caller is not authenticated.
#[utoipa::path(
    post,
    path = "/pools/join",
    tag = "Pools",
    summary = "Join a pool by code",
    request_body = JoinPoolRequest,
    responses(
        (status = 201, description = "Joined"),
        (status = 400, description = "Unknown code or already joined", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
    )
)]
pub async fn join_pool(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(req): Json<JoinPoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.pool_service.join_pool(&req.code, caller).await?;
    Ok(StatusCode::CREATED)
}

/// `GET /pools` — Pools the caller participates in.
///
/// # Errors
///
/// Returns [`ApiError`] when the caller is not authenticated or the store
/// fails.
#[utoipa::path(
    get,
    path = "/pools",
    tag = "Pools",
    summary = "List joined pools",
    responses(
        (status = 200, description = "Joined pools", body = PoolListResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let pools = state
        .pool_service
        .list_pools_for_user(caller)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(PoolListResponse { pools }))
}

/// `GET /pools/:id` — Pool summary by identifier.
///
/// The body carries `null` instead of a 404 when no pool matches, which is
/// the shape the clients expect.
///
/// # Errors
///
/// Returns [`ApiError`] when the caller is not authenticated or the store
/// fails.
#[utoipa::path(
    get,
    path = "/pools/{id}",
    tag = "Pools",
    summary = "Get pool details",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Pool summary or null", body = PoolDetailResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.pool_service.get_pool(PoolId::from_uuid(id)).await?;
    Ok(Json(PoolDetailResponse {
        pool: pool.map(Into::into),
    }))
}

/// Pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/count", get(count_pools))
        .route("/pools/join", post(join_pool))
        .route("/pools/{id}", get(get_pool))
}
