/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - db: PgPool, id_codec: IdCodec, auth: AuthService, chat: ChatStore
 * - Cheap to Clone (everything inside is Arc / pool handle)
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, chat_store::ChatStore, id_codec::IdCodec};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthService>,
    pub chat: Arc<dyn ChatStore>,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        id_codec: IdCodec,
        auth: Arc<AuthService>,
        chat: Arc<dyn ChatStore>,
    ) -> Self {
        Self {
            db,
            id_codec,
            auth,
            chat,
        }
    }
}
