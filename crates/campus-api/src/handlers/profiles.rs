//! Profile handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use campus_core::{Profile, Publication, UpdateProfileRequest};

use crate::auth::AuthSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    Ok(Json(state.profiles.fetch(id).await?))
}

/// Apply an owner edit. Only the profile's owner may update it.
pub async fn update_profile(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    if session.user_id != id {
        return Err(ApiError::Forbidden(
            "Profiles can only be edited by their owner".to_string(),
        ));
    }
    Ok(Json(state.profiles.update(id, req).await?))
}

pub async fn get_publications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Publication>>> {
    Ok(Json(state.profiles.publications_for(id).await?))
}

pub async fn get_research_interests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.profiles.research_interest_names(id).await?))
}
