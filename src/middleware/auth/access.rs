//! Bearer token -> RequestContext in request extensions.
//!
//! This layer never rejects. Every request leaves here with a `RequestContext`, anonymous or
//! authenticated; routes that need a principal use `AuthCtxExtractor`, which turns anonymous
//! into 401.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::state::AppState;

/// Attach request authentication to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take the State extractor; pass state explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let ctx = state
        .auth
        .authenticator()
        .authenticate(authorization.as_deref())
        .await;

    if ctx.is_authenticated() {
        tracing::debug!(
            user_id = ctx.principal().map(|p| p.id.as_str()),
            "request authenticated"
        );
    }

    // middleware -> extractor
    req.extensions_mut().insert(ctx);

    next.run(req).await
}
