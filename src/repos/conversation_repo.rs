/*
 * Responsibility
 * - conversations + conversation_users (membership with ADMIN / MEMBER role)
 * - Creation is one transaction: conversation row, creator as ADMIN, members as MEMBER
 * - Unknown member ids surface as RepoError::MissingReference (FK violation)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MEMBER: &str = "MEMBER";

#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub user_id: Uuid,
    pub username: String,
    pub role_id: String,
    pub joined_at: DateTime<Utc>,
}

pub async fn create(
    db: &PgPool,
    name: &str,
    creator_id: Uuid,
    member_ids: &[Uuid],
) -> RepoResult<ConversationRow> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        INSERT INTO conversations (name)
        VALUES ($1)
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(name)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO conversation_users (conversation_id, user_id, role_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(row.id)
    .bind(creator_id)
    .bind(ROLE_ADMIN)
    .execute(&mut *tx)
    .await
    .map_err(RepoError::from_sqlx)?;

    let members: Vec<Uuid> = dedup_members(creator_id, member_ids);
    if !members.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO conversation_users (conversation_id, user_id, role_id)
            SELECT $1, member_id, $3
            FROM UNNEST($2::uuid[]) AS member_id
            "#,
        )
        .bind(row.id)
        .bind(&members)
        .bind(ROLE_MEMBER)
        .execute(&mut *tx)
        .await
        .map_err(RepoError::from_sqlx)?;
    }

    tx.commit().await?;
    Ok(row)
}

pub async fn get(db: &PgPool, conversation_id: i64) -> RepoResult<Option<ConversationRow>> {
    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM conversations
        WHERE id = $1 AND deleted = false
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> RepoResult<Vec<ConversationRow>> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT c.id, c.name, c.created_at, c.updated_at
        FROM conversations c
        JOIN conversation_users cu ON cu.conversation_id = c.id
        WHERE cu.user_id = $1
            AND cu.deleted = false
            AND c.deleted = false
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn members(db: &PgPool, conversation_id: i64) -> RepoResult<Vec<MemberRow>> {
    let rows = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT cu.user_id, u.username, cu.role_id, cu.created_at AS joined_at
        FROM conversation_users cu
        JOIN users u ON u.id = cu.user_id
        WHERE cu.conversation_id = $1
            AND cu.deleted = false
            AND u.deleted = false
        ORDER BY cu.created_at, u.username
        "#,
    )
    .bind(conversation_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn is_member(db: &PgPool, conversation_id: i64, user_id: Uuid) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM conversation_users
            WHERE conversation_id = $1 AND user_id = $2 AND deleted = false
        )
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(found)
}

// The creator is already ADMIN; repeated ids would violate the membership primary key.
pub(crate) fn dedup_members(creator_id: Uuid, member_ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(member_ids.len());
    for id in member_ids {
        if *id != creator_id && !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
