/*
 * Responsibility
 * - SQLx operations on the users table
 * - PgUserStore: the UserStore the auth services talk to
 * - Soft-deleted rows (deleted = true) are invisible to every query here
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::principal::Principal;
use crate::services::auth::user_store::{UserRecord, UserStore};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    role: Option<String>,
    password_hash: String,
}

impl From<UserRow> for Principal {
    fn from(row: UserRow) -> Self {
        Principal {
            id: row.id.to_string(),
            username: row.username,
            role: row.role,
        }
    }
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, role, created_at
        FROM users
        WHERE deleted = false
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, role, password_hash
            FROM users
            WHERE username = $1 AND deleted = false
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            principal: Principal {
                id: r.id.to_string(),
                username: r.username,
                role: r.role,
            },
            password_hash: r.password_hash,
        }))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Principal>> {
        // Subjects come from token payloads; a non-UUID simply matches nobody.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, role, created_at
            FROM users
            WHERE id = $1 AND deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Principal::from))
    }

    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<Principal> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }
}
