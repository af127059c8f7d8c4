//! Narrow user-store interface the auth services depend on.
//!
//! PostgreSQL implementation: `repos::user_repo::PgUserStore`.
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::services::auth::principal::Principal;

/// What login needs: the public principal plus its stored password hash.
#[derive(Clone)]
pub struct UserRecord {
    pub principal: Principal,
    pub password_hash: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>>;

    // Soft-deleted users are reported as absent.
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Principal>>;

    // Returns `RepoError::Conflict` when the username is already taken.
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<Principal>;
}
