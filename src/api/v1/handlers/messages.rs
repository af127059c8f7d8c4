/*
 * Responsibility
 * - /conversations/{conversation_id}/messages handlers
 * - Author = caller; posting and reading both require membership
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::messages::{CreateMessageRequest, ListMessagesQuery, MessageResponse},
        extractors::{AuthCtxExtractor, public_id::PublicConversationId},
        handlers::conversations::ensure_member,
    },
    error::AppError,
    repos::message_repo::MessageRow,
    state::AppState,
};

fn row_to_response(state: &AppState, row: MessageRow) -> Result<MessageResponse, AppError> {
    Ok(MessageResponse {
        id: state.id_codec.encode(row.id)?,
        conversation_id: state.id_codec.encode(row.conversation_id)?,
        author_id: row.author_id.map(|id| id.to_string()),
        text: row.text,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthCtxExtractor,
    conversation_id: PublicConversationId,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;
    let user_id = auth.user_id()?;
    ensure_member(&state, conversation_id.id, user_id).await?;

    let row = state
        .chat
        .create_message(conversation_id.id, user_id, &req.text)
        .await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthCtxExtractor,
    conversation_id: PublicConversationId,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    ensure_member(&state, conversation_id.id, auth.user_id()?).await?;

    let (limit, offset) = query.page();
    let rows = state
        .chat
        .messages(conversation_id.id, limit, offset)
        .await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}
