use std::sync::{Arc, LazyLock};

use tracing::{debug, error, info, warn};

use crate::repos::error::RepoError;
use crate::services::auth::{
    error::AuthError,
    password,
    principal::Principal,
    token_codec::{TokenCodec, TokenKind},
    user_store::UserStore,
};

const MAX_USERNAME_CHARS: usize = 64;

// Verified against when the username is unknown, so that path costs one Argon2 run too.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    password::hash_password("not-a-real-password")
        .inspect_err(|e| error!(error = %e, "failed to prepare dummy password hash"))
        .ok()
});

#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub access_seconds: u64,
    pub refresh_seconds: u64,
}

/// Service-level return type to keep handlers thin.
///
/// Handlers map this into the HTTP DTO (TokenResponse).
#[derive(Clone, Debug)]
pub struct IssuedTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
}

/// Registration, login and refresh exchange.
///
/// - TokenCodec signs both token kinds; only the TTL and `typ` differ.
/// - The user store is reached only through `UserStore`.
#[derive(Clone)]
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
    ttls: TokenTtls,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("ttls", &self.ttls)
            .finish()
    }
}

impl SessionIssuer {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>, ttls: TokenTtls) -> Self {
        LazyLock::force(&DUMMY_PASSWORD_HASH);
        Self { codec, users, ttls }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Principal, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username is required"));
        }
        if username.chars().count() > MAX_USERNAME_CHARS {
            return Err(AuthError::InvalidInput("username must be <= 64 chars"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password is required"));
        }
        if password != password_confirmation {
            debug!(username = %username, "registration rejected: password mismatch");
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = hash_off_thread(password.to_string()).await?;

        match self.users.create(username, &password_hash).await {
            Ok(principal) => {
                info!(user_id = %principal.id, "user registered");
                Ok(principal)
            }
            Err(RepoError::Conflict) => {
                debug!(username = %username, "registration rejected: username taken");
                Err(AuthError::UsernameTaken)
            }
            Err(e) => {
                error!(error = %e, "failed to create user");
                Err(AuthError::Unavailable(e))
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedTokenPair, AuthError> {
        let record = self
            .users
            .find_by_username(username.trim())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up user by username");
                AuthError::Unavailable(e)
            })?;

        let Some(record) = record else {
            verify_against_dummy(password.to_string()).await?;
            info!("login rejected: no such user");
            return Err(AuthError::NoSuchUser);
        };

        if !verify_off_thread(record.password_hash, password.to_string()).await? {
            info!(user_id = %record.principal.id, "login rejected: bad credentials");
            return Err(AuthError::BadCredentials);
        }

        let pair = self.issue_pair(&record.principal)?;
        info!(user_id = %record.principal.id, "login succeeded");
        Ok(pair)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// - the token must verify and be of kind `refresh`
    /// - the subject must still exist
    ///
    /// Refresh tokens are not revoked on use; the old one stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokenPair, AuthError> {
        let decoded = self.codec.decode(refresh_token).map_err(|e| {
            debug!(reason = %e, "refresh rejected: token did not decode");
            AuthError::InvalidToken
        })?;

        if decoded.kind != TokenKind::Refresh {
            debug!(kind = ?decoded.kind, "refresh rejected: not a refresh token");
            return Err(AuthError::InvalidToken);
        }

        let principal = self
            .users
            .find_by_id(&decoded.subject_id)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up user by id");
                AuthError::Unavailable(e)
            })?
            .ok_or_else(|| {
                debug!(user_id = %decoded.subject_id, "refresh rejected: user no longer exists");
                AuthError::InvalidToken
            })?;

        self.issue_pair(&principal)
    }

    fn issue_pair(&self, principal: &Principal) -> Result<IssuedTokenPair, AuthError> {
        let role = principal.role.as_deref();

        let access = self
            .codec
            .encode(&principal.id, role, TokenKind::Access, self.ttls.access_seconds)
            .map_err(|_| AuthError::Internal)?;
        let refresh = self
            .codec
            .encode(&principal.id, role, TokenKind::Refresh, self.ttls.refresh_seconds)
            .map_err(|_| AuthError::Internal)?;
        debug!(
            user_id = %principal.id,
            access_expires_at = access.expires_at,
            refresh_expires_at = refresh.expires_at,
            "issued token pair"
        );

        Ok(IssuedTokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.ttls.access_seconds,
            refresh_expires_in: self.ttls.refresh_seconds,
        })
    }
}

// Argon2 is CPU-bound; keep it off the async worker threads.
async fn hash_off_thread(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "password hashing task failed");
            AuthError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AuthError::Internal
        })
}

async fn verify_off_thread(stored_hash: String, password: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || password::verify_password(&stored_hash, &password))
        .await
        .map_err(|e| {
            warn!(error = %e, "password verification task failed");
            AuthError::Internal
        })
}

async fn verify_against_dummy(password: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_PASSWORD_HASH.as_deref() {
            let _matched = password::verify_password(hash, &password);
        }
    })
    .await
    .map_err(|e| {
        warn!(error = %e, "password verification task failed");
        AuthError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::repos::memory_user_repo::MemoryUserStore;

    const SECRET: &str = "session-test-secret-session-test-secret";

    fn issuer_with(store: Arc<MemoryUserStore>) -> (SessionIssuer, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(SECRET).unwrap());
        let issuer = SessionIssuer::new(
            codec.clone(),
            store,
            TokenTtls {
                access_seconds: 60,
                refresh_seconds: 120,
            },
        );
        (issuer, codec)
    }

    #[tokio::test]
    async fn register_stores_hash_and_returns_public_fields() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store.clone());

        let principal = issuer.register("alice", "secret", "secret").await.unwrap();

        assert_eq!(principal.username, "alice");
        let stored = store.password_hash_of("alice").await.unwrap();
        assert_ne!(stored, "secret");
        assert!(password::verify_password(&stored, "secret"));
    }

    #[tokio::test]
    async fn register_mismatch_creates_nothing() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store.clone());

        let err = issuer.register("bob", "p1", "p2").await.unwrap_err();

        assert!(matches!(err, AuthError::PasswordMismatch));
        assert_eq!(store.create_calls(), 0);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn register_duplicate_is_username_taken() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store.clone());

        issuer.register("carol", "pw", "pw").await.unwrap();
        let err = issuer.register("carol", "other", "other").await.unwrap_err();

        assert!(matches!(err, AuthError::UsernameTaken));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store.clone());

        assert!(matches!(
            issuer.register("   ", "pw", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            issuer.register("dave", "", "").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            issuer.register(&"x".repeat(65), "pw", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert_eq!(store.create_calls(), 0);
    }

    #[tokio::test]
    async fn login_wrong_password_is_bad_credentials() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store);
        issuer.register("alice", "secret", "secret").await.unwrap();

        let err = issuer.login("alice", "wrong").await.unwrap_err();

        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let hash = DUMMY_PASSWORD_HASH.as_deref().unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(argon2::password_hash::PasswordHash::new(hash).is_ok());
        assert!(!password::verify_password(hash, "secret"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_user_login_costs_about_as_much_as_wrong_password() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store);
        issuer.register("alice", "secret", "secret").await.unwrap();

        // fastest of a few runs each, so scheduler noise only ever shortens the gap
        let mut wrong_password = Duration::MAX;
        let mut unknown_user = Duration::MAX;
        for _ in 0..3 {
            let started = Instant::now();
            let err = issuer.login("alice", "wrong").await.unwrap_err();
            wrong_password = wrong_password.min(started.elapsed());
            assert!(matches!(err, AuthError::BadCredentials));

            let started = Instant::now();
            let err = issuer.login("mallory", "wrong").await.unwrap_err();
            unknown_user = unknown_user.min(started.elapsed());
            assert!(matches!(err, AuthError::NoSuchUser));
        }

        assert!(
            unknown_user * 4 >= wrong_password,
            "wrong_password={wrong_password:?} unknown_user={unknown_user:?}"
        );
    }

    #[tokio::test]
    async fn login_unknown_user_is_no_such_user() {
        let (issuer, _) = issuer_with(Arc::new(MemoryUserStore::new()));

        let err = issuer.login("nobody", "secret").await.unwrap_err();

        assert!(matches!(err, AuthError::NoSuchUser));
    }

    #[tokio::test]
    async fn login_issues_access_and_refresh_with_independent_ttls() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, codec) = issuer_with(store);
        let alice = issuer.register("alice", "secret", "secret").await.unwrap();

        let pair = issuer.login("alice", "secret").await.unwrap();

        let access = codec.decode(&pair.access_token).unwrap();
        let refresh = codec.decode(&pair.refresh_token).unwrap();
        assert_eq!(access.subject_id, alice.id);
        assert_eq!(refresh.subject_id, alice.id);
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(access.expires_at - access.issued_at, 60);
        assert_eq!(refresh.expires_at - refresh.issued_at, 120);
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 60);
        assert_eq!(pair.refresh_expires_in, 120);
    }

    #[tokio::test]
    async fn refresh_exchanges_only_refresh_tokens() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, codec) = issuer_with(store);
        let alice = issuer.register("alice", "secret", "secret").await.unwrap();
        let pair = issuer.login("alice", "secret").await.unwrap();

        let renewed = issuer.refresh(&pair.refresh_token).await.unwrap();
        assert_eq!(codec.decode(&renewed.access_token).unwrap().subject_id, alice.id);

        let err = issuer.refresh(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let err = issuer.refresh("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn refresh_fails_for_deleted_user() {
        let store = Arc::new(MemoryUserStore::new());
        let (issuer, _) = issuer_with(store.clone());
        let alice = issuer.register("alice", "secret", "secret").await.unwrap();
        let pair = issuer.login("alice", "secret").await.unwrap();

        store.remove(&alice.id).await;
        let err = issuer.refresh(&pair.refresh_token).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }
}
