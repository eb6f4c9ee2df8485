//! AI assistant handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::ChatTurn;

use crate::auth::{AuthSession, MaybeSession};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Ask the assistant a question. Always answers: a configured backend
/// failure substitutes a fixed apology, and with no credential at all
/// the canned-response fallback replies instead.
pub async fn chat(
    State(state): State<AppState>,
    MaybeSession(user_id): MaybeSession,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let reply = state.assistant.reply(user_id, &req.message).await;
    Ok(Json(ChatResponse { reply }))
}

/// The acting member's transcript, opened by the synthetic greeting.
pub async fn history(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Vec<ChatTurn>>> {
    Ok(Json(state.assistant.transcript(session.user_id).await))
}

#[derive(Debug, Deserialize)]
pub struct AssistantSettingsRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantSettingsResponse {
    pub configured: bool,
}

/// Store the acting member's completion-service credential. An empty
/// string clears it. The credential is never validated here; a bad key
/// simply surfaces as apology replies.
pub async fn update_settings(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<AssistantSettingsRequest>,
) -> ApiResult<Json<AssistantSettingsResponse>> {
    state
        .assistant
        .set_credential(session.user_id, req.api_key)
        .await;
    let configured = state
        .assistant
        .credential_configured(Some(session.user_id))
        .await;
    Ok(Json(AssistantSettingsResponse { configured }))
}

pub async fn get_settings(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<AssistantSettingsResponse>> {
    let configured = state
        .assistant
        .credential_configured(Some(session.user_id))
        .await;
    Ok(Json(AssistantSettingsResponse { configured }))
}
