//! Alumni directory handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use campus_core::Profile;
use campus_match::alumni_matches;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AlumniQuery {
    pub q: Option<String>,
}

/// List alumni profiles. The free-text query matches name, institution,
/// major, and any skill or research interest.
pub async fn list_alumni(
    State(state): State<AppState>,
    Query(query): Query<AlumniQuery>,
) -> ApiResult<Json<Vec<Profile>>> {
    let alumni = state.profiles.list_alumni().await?;
    let filtered = match query.q.as_deref() {
        Some(q) => alumni.into_iter().filter(|p| alumni_matches(p, q)).collect(),
        None => alumni,
    };
    Ok(Json(filtered))
}
