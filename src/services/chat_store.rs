//! Conversation and message storage the chat handlers depend on.
//!
//! PostgreSQL implementation: `repos::chat_repo::PgChatStore`.
use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::{
    conversation_repo::{ConversationRow, MemberRow},
    error::RepoResult,
    message_repo::MessageRow,
};

#[async_trait]
pub trait ChatStore: Send + Sync + std::fmt::Debug {
    // The creator joins as ADMIN, `member_ids` as MEMBER.
    // An unknown member id is `RepoError::MissingReference`.
    async fn create_conversation(
        &self,
        name: &str,
        creator_id: Uuid,
        member_ids: &[Uuid],
    ) -> RepoResult<ConversationRow>;

    async fn conversation(&self, conversation_id: i64) -> RepoResult<Option<ConversationRow>>;

    async fn conversations_for(&self, user_id: Uuid) -> RepoResult<Vec<ConversationRow>>;

    async fn members(&self, conversation_id: i64) -> RepoResult<Vec<MemberRow>>;

    async fn is_member(&self, conversation_id: i64, user_id: Uuid) -> RepoResult<bool>;

    async fn create_message(
        &self,
        conversation_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<MessageRow>;

    // Newest first.
    async fn messages(
        &self,
        conversation_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<MessageRow>>;
}
