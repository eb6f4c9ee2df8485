//! Feedback handler. Submissions are logged for operators; nothing is
//! returned to the sender beyond the acknowledgement.

use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::MaybeSession;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
    pub category: Option<String>,
}

pub async fn submit_feedback(
    MaybeSession(user_id): MaybeSession,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<StatusCode> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Feedback message cannot be empty".to_string(),
        ));
    }

    info!(
        subsystem = "api",
        component = "feedback",
        user_id = user_id.map(|u| u.to_string()).unwrap_or_else(|| "anonymous".to_string()),
        category = req.category.as_deref().unwrap_or("general"),
        message = %req.message,
        "Feedback received"
    );
    Ok(StatusCode::NO_CONTENT)
}
