//! In-memory `UserStore` for tests (no database needed).
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::principal::Principal;
use crate::services::auth::user_store::{UserRecord, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    // keyed by user id
    users: RwLock<HashMap<String, UserRecord>>,
    creates: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.users.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn password_hash_of(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .await
            .values()
            .find(|r| r.principal.username == username)
            .map(|r| r.password_hash.clone())
    }

    /// Number of `create` calls that reached the store, successful or not.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|r| r.principal.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Principal>> {
        Ok(self
            .users
            .read()
            .await
            .get(id)
            .map(|r| r.principal.clone()))
    }

    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<Principal> {
        self.creates.fetch_add(1, Ordering::SeqCst);

        let mut users = self.users.write().await;
        if users.values().any(|r| r.principal.username == username) {
            return Err(RepoError::Conflict);
        }

        let principal = Principal {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: None,
        };
        users.insert(
            principal.id.clone(),
            UserRecord {
                principal: principal.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(principal)
    }
}
