/*
 * Responsibility
 * - PgChatStore: the ChatStore the conversation/message handlers talk to
 * - Thin delegation to conversation_repo / message_repo
 */
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::{
    conversation_repo::{self, ConversationRow, MemberRow},
    error::RepoResult,
    message_repo::{self, MessageRow},
};
use crate::services::chat_store::ChatStore;

#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn create_conversation(
        &self,
        name: &str,
        creator_id: Uuid,
        member_ids: &[Uuid],
    ) -> RepoResult<ConversationRow> {
        conversation_repo::create(&self.pool, name, creator_id, member_ids).await
    }

    async fn conversation(&self, conversation_id: i64) -> RepoResult<Option<ConversationRow>> {
        conversation_repo::get(&self.pool, conversation_id).await
    }

    async fn conversations_for(&self, user_id: Uuid) -> RepoResult<Vec<ConversationRow>> {
        conversation_repo::list_for_user(&self.pool, user_id).await
    }

    async fn members(&self, conversation_id: i64) -> RepoResult<Vec<MemberRow>> {
        conversation_repo::members(&self.pool, conversation_id).await
    }

    async fn is_member(&self, conversation_id: i64, user_id: Uuid) -> RepoResult<bool> {
        conversation_repo::is_member(&self.pool, conversation_id, user_id).await
    }

    async fn create_message(
        &self,
        conversation_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<MessageRow> {
        message_repo::create(&self.pool, conversation_id, author_id, text).await
    }

    async fn messages(
        &self,
        conversation_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<MessageRow>> {
        message_repo::list(&self.pool, conversation_id, limit, offset).await
    }
}
