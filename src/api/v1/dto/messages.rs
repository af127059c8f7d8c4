/*
 * Responsibility
 * - Messages request/response DTOs + paging query
 * - The author is always the caller; there is no author field in the request
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_TEXT_CHARS: usize = 4000;
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub text: String,
}

impl CreateMessageRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("text is required");
        }
        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err("text must be <= 4000 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListMessagesQuery {
    /// (limit, offset), clamped to sane bounds.
    pub fn page(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,              // encoded
    pub conversation_id: String, // encoded
    pub author_id: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
