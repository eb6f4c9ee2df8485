//! Study-buddy matching handlers.
//!
//! Candidate scores are computed live from current subject sets; only
//! confirmed matches are persisted, frozen with the score computed at
//! match time.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use campus_core::{StudyBuddyCandidate, StudyBuddyRequest, StudyMatch, UpsertStudyBuddyRequest};
use campus_match::{buddy_matches, match_score, rank_candidates, shared_interests};

use crate::auth::AuthSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// The acting member's subject set: their standing request if they have
/// one, otherwise their profile interests.
async fn requester_subjects(state: &AppState, user_id: Uuid) -> ApiResult<Vec<String>> {
    if let Some(request) = state.buddies.request_for(user_id).await? {
        if !request.subjects.is_empty() {
            return Ok(request.subjects);
        }
    }
    Ok(state.profiles.fetch(user_id).await?.subjects_of_interest)
}

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub q: Option<String>,
}

/// Rank candidate study partners for the acting member.
///
/// Candidates come from other members' active requests; scores and
/// shared interests are computed against the requester's current
/// subject set and never persisted.
pub async fn list_candidates(
    State(state): State<AppState>,
    session: AuthSession,
    Query(query): Query<CandidateQuery>,
) -> ApiResult<Json<Vec<StudyBuddyCandidate>>> {
    let subjects = requester_subjects(&state, session.user_id).await?;

    let requests = state.buddies.active_requests(session.user_id).await?;
    let ids: Vec<Uuid> = requests.iter().map(|r| r.user_id).collect();
    let profiles = state.profiles.fetch_many(&ids).await?;

    let pairs: Vec<_> = requests
        .into_iter()
        .filter_map(|request| {
            profiles
                .iter()
                .find(|p| p.id == request.user_id)
                .cloned()
                .map(|profile| (profile, request))
        })
        .collect();

    let mut candidates = rank_candidates(&subjects, pairs);
    if let Some(q) = query.q.as_deref() {
        candidates.retain(|c| buddy_matches(c, q));
    }

    Ok(Json(candidates))
}

/// The acting member's own standing request, if any.
pub async fn get_own_request(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Option<StudyBuddyRequest>>> {
    Ok(Json(state.buddies.request_for(session.user_id).await?))
}

/// Create or replace the acting member's standing request.
pub async fn upsert_request(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<UpsertStudyBuddyRequest>,
) -> ApiResult<Json<StudyBuddyRequest>> {
    let request = state.buddies.upsert_request(session.user_id, req).await?;
    Ok(Json(request))
}

pub async fn list_matches(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Vec<StudyMatch>>> {
    Ok(Json(state.buddies.matches_for(session.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct RecordMatchRequest {
    pub user_id: Uuid,
}

/// Confirm a match with another member.
///
/// The score is computed from both members' current subject sets at
/// this moment and stored with the match; later subject edits do not
/// rewrite it.
pub async fn record_match(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<RecordMatchRequest>,
) -> ApiResult<(StatusCode, Json<StudyMatch>)> {
    if req.user_id == session.user_id {
        return Err(ApiError::BadRequest(
            "Cannot record a match with yourself".to_string(),
        ));
    }

    let own = requester_subjects(&state, session.user_id).await?;
    let other = requester_subjects(&state, req.user_id).await?;

    let score = match_score(&own, &other) as i32;
    let shared = shared_interests(&own, &other);

    let recorded = state
        .buddies
        .record_match(session.user_id, req.user_id, score, shared)
        .await?;

    info!(
        subsystem = "api",
        component = "study_buddies",
        op = "record_match",
        match_score = score,
        "Study match recorded"
    );
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Deactivate the acting member's own standing request.
pub async fn deactivate_request(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<StatusCode> {
    let Some(existing) = state.buddies.request_for(session.user_id).await? else {
        return Err(ApiError::NotFound("No standing request".to_string()));
    };
    state
        .buddies
        .upsert_request(
            session.user_id,
            UpsertStudyBuddyRequest {
                subjects: existing.subjects,
                availability: existing.availability,
                description: existing.description,
                is_active: false,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
