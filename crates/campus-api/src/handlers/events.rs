//! Event handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use campus_core::{CreateEventRequest, Event};
use campus_match::event_matches;

use crate::auth::AuthSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub q: Option<String>,
}

/// List upcoming events, soonest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = state.events.list_upcoming().await?;
    let filtered = match query.q.as_deref() {
        Some(q) => events.into_iter().filter(|e| event_matches(e, q)).collect(),
        None => events,
    };
    Ok(Json(filtered))
}

pub async fn create_event(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Event title is required".to_string()));
    }

    let event = state.events.insert(session.user_id, req).await?;
    info!(
        subsystem = "api",
        component = "events",
        op = "create",
        event_id = %event.id,
        "Event created"
    );
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.events.fetch(id).await?))
}

/// Register the acting member for an event. Full events return 400.
pub async fn join_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.events.join(id, session.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.events.leave(id, session.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
