use std::sync::Arc;

use tracing::{debug, error};

use crate::services::auth::{
    principal::RequestContext,
    token_codec::{self, TokenCodec, TokenKind},
    user_store::UserStore,
};

const BEARER_SCHEME: &str = "bearer";

/// Resolves an `Authorization` header into a `RequestContext`.
///
/// Never fails: every rejection degrades to an anonymous context.
/// NoHeader / NotBearer / Malformed / BadSignature / Expired / NotAccess / UnknownUser -> Anonymous
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator").finish_non_exhaustive()
    }
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> RequestContext {
        self.authenticate_at(authorization, token_codec::now_unix())
            .await
    }

    pub async fn authenticate_at(&self, authorization: Option<&str>, now: i64) -> RequestContext {
        let Some(token) = authorization.and_then(bearer_token) else {
            return RequestContext::anonymous();
        };

        let decoded = match self.codec.decode_at(token, now) {
            Ok(decoded) => decoded,
            Err(reason) => {
                debug!(%reason, "access token rejected");
                return RequestContext::anonymous();
            }
        };

        if decoded.kind != TokenKind::Access {
            debug!(kind = ?decoded.kind, "non-access token presented as bearer");
            return RequestContext::anonymous();
        }

        match self.users.find_by_id(&decoded.subject_id).await {
            Ok(Some(principal)) => RequestContext::authenticated(principal),
            Ok(None) => {
                debug!(user_id = %decoded.subject_id, "token subject no longer exists");
                RequestContext::anonymous()
            }
            Err(e) => {
                error!(error = %e, "user lookup failed during authentication");
                RequestContext::anonymous()
            }
        }
    }
}

/// The whole remainder after the `Bearer` scheme and its whitespace separator, trimmed.
/// Scheme match is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim_start();
    let split = header.find(|c: char| c.is_ascii_whitespace())?;
    let (scheme, rest) = header.split_at(split);
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() { None } else { Some(token) }
}
