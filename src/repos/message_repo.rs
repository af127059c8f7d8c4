/*
 * Responsibility
 * - messages CRUD (create + paged listing per conversation)
 * - Membership checks belong to the caller (handler), not here
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub conversation_id: i64,
    pub author_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn create(
    db: &PgPool,
    conversation_id: i64,
    author_id: Uuid,
    text: &str,
) -> RepoResult<MessageRow> {
    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (conversation_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, conversation_id, author_id, text, created_at, updated_at
        "#,
    )
    .bind(conversation_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

// Newest first.
pub async fn list(
    db: &PgPool,
    conversation_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<MessageRow>> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, conversation_id, author_id, text, created_at, updated_at
        FROM messages
        WHERE conversation_id = $1 AND deleted = false
        ORDER BY id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(conversation_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
