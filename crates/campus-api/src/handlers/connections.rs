//! Connection request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use campus_core::Connection;

use crate::auth::AuthSession;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_connections(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Vec<Connection>>> {
    Ok(Json(state.connections.list_for(session.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ConnectionRequestBody {
    pub addressee_id: Uuid,
}

/// File a connection request. A duplicate pair surfaces as 409.
pub async fn request_connection(
    State(state): State<AppState>,
    session: AuthSession,
    Json(req): Json<ConnectionRequestBody>,
) -> ApiResult<(StatusCode, Json<Connection>)> {
    let connection = state
        .connections
        .request(session.user_id, req.addressee_id)
        .await?;
    Ok((StatusCode::CREATED, Json(connection)))
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub accept: bool,
}

/// Accept or reject a pending request. Addressee only.
pub async fn respond_to_connection(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondBody>,
) -> ApiResult<Json<Connection>> {
    let connection = state
        .connections
        .respond(id, session.user_id, req.accept)
        .await?;
    Ok(Json(connection))
}
