//! # campus-api
//!
//! HTTP API server for campuslink. The router is assembled here so the
//! binary and the handler tests share one definition.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use handlers::{
    alumni, assistant, connections, events, feedback, messages, profiles, resources,
    study_buddies,
};

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically, which
/// keeps log correlation cheap.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// JSON 404 for unknown routes, matching the error body shape used
/// everywhere else.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        // Resources
        .route(
            "/api/v1/resources",
            get(resources::list_resources).post(resources::upload_resource),
        )
        .route("/api/v1/resources/:id", get(resources::get_resource))
        .route(
            "/api/v1/resources/:id/download",
            post(resources::download_resource),
        )
        .route("/api/v1/resources/:id/like", post(resources::like_resource))
        .route("/api/v1/resources/:id/tags", post(resources::add_tag))
        .route(
            "/api/v1/resources/:id/tags/:tag",
            delete(resources::remove_tag),
        )
        // Profiles
        .route(
            "/api/v1/profiles/:id",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route(
            "/api/v1/profiles/:id/publications",
            get(profiles::get_publications),
        )
        .route(
            "/api/v1/profiles/:id/research-interests",
            get(profiles::get_research_interests),
        )
        // Alumni directory
        .route("/api/v1/alumni", get(alumni::list_alumni))
        // Events
        .route(
            "/api/v1/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/v1/events/:id", get(events::get_event))
        .route("/api/v1/events/:id/join", post(events::join_event))
        .route("/api/v1/events/:id/leave", post(events::leave_event))
        // Messaging
        .route(
            "/api/v1/conversations",
            get(messages::list_conversations).post(messages::create_conversation),
        )
        .route(
            "/api/v1/conversations/:id/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/api/v1/conversations/:id/read", post(messages::mark_read))
        // Connections
        .route(
            "/api/v1/connections",
            get(connections::list_connections).post(connections::request_connection),
        )
        .route(
            "/api/v1/connections/:id/respond",
            post(connections::respond_to_connection),
        )
        // Study buddies
        .route(
            "/api/v1/study-buddies",
            get(study_buddies::list_candidates),
        )
        .route(
            "/api/v1/study-buddies/request",
            get(study_buddies::get_own_request)
                .put(study_buddies::upsert_request)
                .delete(study_buddies::deactivate_request),
        )
        .route(
            "/api/v1/study-buddies/matches",
            get(study_buddies::list_matches).post(study_buddies::record_match),
        )
        // Assistant
        .route("/api/v1/assistant/chat", post(assistant::chat))
        .route("/api/v1/assistant/history", get(assistant::history))
        .route(
            "/api/v1/settings/assistant",
            get(assistant::get_settings).put(assistant::update_settings),
        )
        // Feedback
        .route("/api/v1/feedback", post(feedback::submit_feedback))
        .fallback(not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)) // 10 MB
        .with_state(state)
}
