//! Resource sharing handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use campus_core::{CreateResourceRequest, Resource, ResourceCategory, ResourceSort};
use campus_match::{sort_popular, sort_recent, FilterSet, ResourceFilter};

use crate::auth::AuthSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceListQuery {
    pub q: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tag: Option<String>,
    pub downloads_over: Option<i64>,
    #[serde(default)]
    pub sort: ResourceSort,
}

impl ResourceListQuery {
    /// Structured part of the query as an AND-combined predicate set.
    fn structured_filter(&self) -> FilterSet {
        let mut set = FilterSet::new();
        if let Some(tag) = &self.tag {
            set = set.contains("tags", tag.clone());
        }
        if let Some(bound) = self.downloads_over {
            set = set.gt("downloads", bound as f64);
        }
        set
    }
}

/// List resources, filtered and sorted in memory after the fetch.
///
/// Query, subject, type, tag, and download-count filters are AND-ed; an
/// unknown subject or type value yields an empty list rather than an
/// error.
#[utoipa::path(
    get,
    path = "/api/v1/resources",
    params(
        ("q" = Option<String>, Query, description = "Free-text query over title and description"),
        ("subject" = Option<String>, Query, description = "Exact category filter"),
        ("type" = Option<String>, Query, description = "Exact category filter"),
        ("tag" = Option<String>, Query, description = "Tag-set element filter"),
        ("downloads_over" = Option<i64>, Query, description = "Keep resources downloaded strictly more than this many times"),
        ("sort" = Option<String>, Query, description = "recent (default) or popular"),
    ),
    responses((status = 200, body = [Resource])),
    tag = "Resources"
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceListQuery>,
) -> ApiResult<Json<Vec<Resource>>> {
    let filter = ResourceFilter {
        query: query.q.clone(),
        subject: query.subject.clone(),
        kind: query.kind.clone(),
    };

    let mut resources: Vec<Resource> = state
        .resources
        .list()
        .await?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();

    let structured = query.structured_filter();
    if !structured.is_empty() {
        resources = structured.apply(&resources).into_iter().cloned().collect();
    }

    match query.sort {
        ResourceSort::Recent => sort_recent(&mut resources),
        ResourceSort::Popular => sort_popular(&mut resources),
    }

    Ok(Json(resources))
}

/// Upload body with every field optional, so a missing field surfaces
/// as its own validation message rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct UploadResourcePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl UploadResourcePayload {
    fn into_request(self) -> ApiResult<CreateResourceRequest> {
        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Resource title is required".to_string(),
            ));
        }
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Resource category is required".to_string()))?;
        let category: ResourceCategory = category.trim().parse()?;
        let file_url = self.file_url.unwrap_or_default();
        if file_url.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Resource file is required".to_string(),
            ));
        }
        Ok(CreateResourceRequest {
            title,
            description: self.description,
            category,
            file_url,
            thumbnail_url: self.thumbnail_url,
            tags: self.tags,
        })
    }
}

/// Upload a new resource. The download counter always starts at zero.
pub async fn upload_resource(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<UploadResourcePayload>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    let req = payload.into_request()?;
    let resource = state.resources.insert(session.user_id, req).await?;
    info!(
        subsystem = "api",
        component = "resources",
        op = "upload",
        resource_id = %resource.id,
        "Resource uploaded"
    );
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Resource>> {
    Ok(Json(state.resources.fetch(id).await?))
}

#[derive(Debug, serde::Serialize)]
pub struct DownloadResponse {
    pub downloads: i64,
}

/// Record one download and return the new counter value.
pub async fn download_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DownloadResponse>> {
    let downloads = state.resources.record_download(id).await?;
    Ok(Json(DownloadResponse { downloads }))
}

#[derive(Debug, serde::Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// Toggle the acting member's like on a resource.
pub async fn like_resource(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeResponse>> {
    let liked = state.resources.toggle_like(id, session.user_id).await?;
    Ok(Json(LikeResponse { liked }))
}

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    pub tag: String,
}

/// Add a tag. Adding an already-present tag is a no-op.
pub async fn add_tag(
    State(state): State<AppState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
    Json(req): Json<AddTagRequest>,
) -> ApiResult<StatusCode> {
    state.resources.add_tag(id, &req.tag).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a tag. Removing an absent tag is a no-op.
pub async fn remove_tag(
    State(state): State<AppState>,
    _session: AuthSession,
    Path((id, tag)): Path<(Uuid, String)>,
) -> ApiResult<StatusCode> {
    state.resources.remove_tag(id, &tag).await?;
    Ok(StatusCode::NO_CONTENT)
}
