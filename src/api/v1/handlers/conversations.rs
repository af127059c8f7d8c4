/*
 * Responsibility
 * - /conversations handlers
 * - The caller always comes from AuthCtxExtractor, never from the request body
 * - Reading a conversation requires membership (403 otherwise)
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::conversations::{ConversationResponse, CreateConversationRequest, MemberResponse},
        extractors::{AuthCtxExtractor, public_id::PublicConversationId},
    },
    error::AppError,
    repos::conversation_repo::{ConversationRow, MemberRow},
    state::AppState,
};

/// 404 for a missing conversation, 403 for one the caller is not in.
pub(crate) async fn ensure_member(
    state: &AppState,
    conversation_id: i64,
    user_id: Uuid,
) -> Result<ConversationRow, AppError> {
    let row = state
        .chat
        .conversation(conversation_id)
        .await?
        .ok_or(AppError::not_found("conversation"))?;

    if !state.chat.is_member(conversation_id, user_id).await? {
        tracing::info!(%user_id, conversation_id, "non-member access to conversation");
        return Err(AppError::Forbidden);
    }

    Ok(row)
}

fn row_to_response(
    state: &AppState,
    row: ConversationRow,
    members: Option<Vec<MemberRow>>,
) -> Result<ConversationResponse, AppError> {
    Ok(ConversationResponse {
        id: state.id_codec.encode(row.id)?,
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
        members: members.map(|rows| {
            rows.into_iter()
                .map(|m| MemberResponse {
                    user_id: m.user_id.to_string(),
                    username: m.username,
                    role: m.role_id,
                    joined_at: m.joined_at,
                })
                .collect()
        }),
    })
}

pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthCtxExtractor,
    Json(req): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;
    let user_id = auth.user_id()?;

    let row = state
        .chat
        .create_conversation(req.name.trim(), user_id, &req.member_ids)
        .await?;
    let members = state.chat.members(row.id).await?;

    tracing::info!(%user_id, conversation_id = row.id, "conversation created");
    let res = row_to_response(&state, row, Some(members))?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthCtxExtractor,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let user_id = auth.user_id()?;
    let rows = state.chat.conversations_for(user_id).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row, None)?);
    }

    Ok(Json(res))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthCtxExtractor,
    conversation_id: PublicConversationId,
) -> Result<Json<ConversationResponse>, AppError> {
    let row = ensure_member(&state, conversation_id.id, auth.user_id()?).await?;
    let members = state.chat.members(row.id).await?;

    Ok(Json(row_to_response(&state, row, Some(members))?))
}
