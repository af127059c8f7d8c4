/*
 * Responsibility
 * - GET /users (authenticated; public fields only)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::users::UserResponse, extractors::AuthCtxExtractor},
    error::AppError,
    repos::user_repo,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db).await?;

    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}
