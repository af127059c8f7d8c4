use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::principal::{Principal, RequestContext};
use crate::state::AppState;

/// Extractor for routes that require an authenticated principal.
///
/// Missing context (middleware not applied) is treated the same as anonymous: 401.
#[derive(Debug, Clone)]
pub struct AuthCtxExtractor(pub Principal);

impl AuthCtxExtractor {
    /// Principal ids are UUIDs in this service.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.id).map_err(|_| {
            tracing::warn!(user_id = %self.0.id, "principal id is not a UUID");
            AppError::Unauthorized
        })
    }
}

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.principal().cloned())
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
