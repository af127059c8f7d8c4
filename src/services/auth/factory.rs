/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    authenticator::RequestAuthenticator,
    session::{SessionIssuer, TokenTtls},
    token_codec::{CodecError, TokenCodec},
    user_store::UserStore,
};

/// Process-wide auth services. Immutable after startup; shared through `AppState`.
#[derive(Clone, Debug)]
pub struct AuthService {
    sessions: SessionIssuer,
    authenticator: RequestAuthenticator,
}

impl AuthService {
    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    pub fn authenticator(&self) -> &RequestAuthenticator {
        &self.authenticator
    }
}

pub fn build_auth_service(
    config: &Config,
    users: Arc<dyn UserStore>,
) -> Result<Arc<AuthService>, CodecError> {
    let codec = Arc::new(TokenCodec::new(&config.jwt_secret)?);

    let sessions = SessionIssuer::new(
        codec.clone(),
        users.clone(),
        TokenTtls {
            access_seconds: config.access_token_ttl_seconds,
            refresh_seconds: config.refresh_token_ttl_seconds,
        },
    );
    let authenticator = RequestAuthenticator::new(codec, users);

    Ok(Arc::new(AuthService {
        sessions,
        authenticator,
    }))
}
