//! Direct-messaging handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::{ConversationSummary, Message};

use crate::auth::AuthSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// List the acting member's conversations, most recently active first.
pub async fn list_conversations(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(state.messaging.conversations_for(session.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    pub id: Uuid,
}

/// Open a conversation. The creator is always a participant, whether or
/// not the request lists them.
pub async fn create_conversation(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<CreateConversationResponse>)> {
    let mut participants = req.participant_ids;
    if !participants.contains(&session.user_id) {
        participants.push(session.user_id);
    }

    let id = state.messaging.create_conversation(&participants).await?;
    Ok((StatusCode::CREATED, Json(CreateConversationResponse { id })))
}

/// Messages of a conversation, oldest first. Participants only.
pub async fn list_messages(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Message>>> {
    Ok(Json(state.messaging.messages(id, session.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Message content cannot be empty".to_string(),
        ));
    }

    let message = state
        .messaging
        .send(id, session.user_id, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Mark everything the other participants sent as read.
pub async fn mark_read(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.messaging.mark_read(id, session.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
