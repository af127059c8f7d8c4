//! In-memory `ChatStore` for tests. Member names resolve through a `MemoryUserStore`.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::{
    conversation_repo::{ConversationRow, MemberRow, ROLE_ADMIN, ROLE_MEMBER, dedup_members},
    error::{RepoError, RepoResult},
    memory_user_repo::MemoryUserStore,
    message_repo::MessageRow,
};
use crate::services::{auth::user_store::UserStore, chat_store::ChatStore};

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    conversations: Vec<ConversationRow>,
    // (conversation_id, member)
    memberships: Vec<(i64, MemberRow)>,
    messages: Vec<MessageRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug)]
pub struct MemoryChatStore {
    users: Arc<MemoryUserStore>,
    tables: RwLock<Tables>,
}

impl MemoryChatStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            tables: RwLock::new(Tables::default()),
        }
    }

    async fn member(&self, user_id: Uuid, role: &str) -> RepoResult<MemberRow> {
        let principal = self
            .users
            .find_by_id(&user_id.to_string())
            .await?
            .ok_or(RepoError::MissingReference)?;

        Ok(MemberRow {
            user_id,
            username: principal.username,
            role_id: role.to_string(),
            joined_at: Utc::now(),
        })
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn create_conversation(
        &self,
        name: &str,
        creator_id: Uuid,
        member_ids: &[Uuid],
    ) -> RepoResult<ConversationRow> {
        let mut members = vec![self.member(creator_id, ROLE_ADMIN).await?];
        for id in dedup_members(creator_id, member_ids) {
            members.push(self.member(id, ROLE_MEMBER).await?);
        }

        let mut tables = self.tables.write().await;
        let row = ConversationRow {
            id: tables.next_id(),
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.conversations.push(row.clone());
        for member in members {
            tables.memberships.push((row.id, member));
        }

        Ok(row)
    }

    async fn conversation(&self, conversation_id: i64) -> RepoResult<Option<ConversationRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned())
    }

    async fn conversations_for(&self, user_id: Uuid) -> RepoResult<Vec<ConversationRow>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ConversationRow> = tables
            .conversations
            .iter()
            .filter(|c| {
                tables
                    .memberships
                    .iter()
                    .any(|(id, m)| *id == c.id && m.user_id == user_id)
            })
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn members(&self, conversation_id: i64) -> RepoResult<Vec<MemberRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|(id, _)| *id == conversation_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn is_member(&self, conversation_id: i64, user_id: Uuid) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .any(|(id, m)| *id == conversation_id && m.user_id == user_id))
    }

    async fn create_message(
        &self,
        conversation_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<MessageRow> {
        let mut tables = self.tables.write().await;
        if !tables.conversations.iter().any(|c| c.id == conversation_id) {
            return Err(RepoError::MissingReference);
        }

        let row = MessageRow {
            id: tables.next_id(),
            conversation_id,
            author_id: Some(author_id),
            text: text.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.messages.push(row.clone());

        Ok(row)
    }

    async fn messages(
        &self,
        conversation_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<MessageRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .rev()
            .filter(|m| m.conversation_id == conversation_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
