/*
 * Responsibility
 * - Users response DTO (public fields only, never the password hash)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::user_repo::UserRow;
use crate::services::auth::principal::Principal;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Principal> for UserResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            username: p.username,
            role: p.role,
            created_at: None,
        }
    }
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            username: row.username,
            role: row.role,
            created_at: Some(row.created_at),
        }
    }
}
