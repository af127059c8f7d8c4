/*
 * Responsibility
 * - /auth/register, /auth/login, /auth/refresh, /me
 * - Thin: DTO in -> SessionIssuer -> DTO out; AuthError -> AppError keeps failures generic
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            auth::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse},
            users::UserResponse,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let principal = state
        .auth
        .sessions()
        .register(&req.username, &req.password, &req.password_confirmation)
        .await?;

    Ok((StatusCode::CREATED, Json(principal.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let pair = state
        .auth
        .sessions()
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(pair.into()))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let pair = state.auth.sessions().refresh(&req.refresh_token).await?;

    Ok(Json(pair.into()))
}

pub async fn me(AuthCtxExtractor(principal): AuthCtxExtractor) -> Json<UserResponse> {
    Json(principal.into())
}
