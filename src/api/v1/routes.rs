/*
 * Responsibility
 * - URL layout of v1
 * - Every route passes through middleware::auth::access (applied in app.rs); which routes
 *   need a principal is decided by the handler's extractors, not here
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, me, refresh, register},
    conversations::{create_conversation, get_conversation, list_conversations},
    health::health,
    messages::{create_message, list_messages},
    users::list_users,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/me", get(me))
        .route("/users", get(list_users))
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/conversations/{conversation_id}", get(get_conversation))
        .route(
            "/conversations/{conversation_id}/messages",
            get(list_messages).post(create_message),
        )
}
