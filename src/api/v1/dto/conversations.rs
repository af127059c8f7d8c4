/*
 * Responsibility
 * - Conversations request/response DTOs
 * - Ids in responses are public (sqids-encoded), never the internal BIGINT
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_NAME_CHARS: usize = 100;
const MAX_MEMBERS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

impl CreateConversationRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err("name must be <= 100 chars");
        }
        if self.member_ids.len() > MAX_MEMBERS {
            return Err("at most 100 members");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String, // encoded
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    // Present on single-conversation responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberResponse>>,
}
