use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use reblog_types::{group_by_month, MonthArchive, ReblogEntry, Star};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    middleware::identity::CurrentUser,
    state::AppState,
};

/// Either a JSON array or the comma-separated form a plain HTML form posts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageIds {
    List(Vec<String>),
    Joined(String),
}

impl MessageIds {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            MessageIds::List(ids) => ids,
            MessageIds::Joined(raw) => raw.split(',').map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReblogRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub message_ids: MessageIds,
    pub channel_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListReblogsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct ArchiveMonth {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub entry_ids: Vec<String>,
}

impl From<&MonthArchive> for ArchiveMonth {
    fn from(archive: &MonthArchive) -> Self {
        Self {
            label: archive.label(),
            year: archive.year,
            month: archive.month,
            entry_ids: archive.entries.iter().map(|e| e.id.clone()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListReblogsResponse {
    pub entries: Vec<ReblogEntry>,
    pub archive: Vec<ArchiveMonth>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct ReblogDetailResponse {
    pub entry: ReblogEntry,
    pub stars: Vec<Star>,
    pub starred: bool,
}

/// Create a reblog from selected messages
pub async fn create_reblog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateReblogRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let ids = req.message_ids.into_vec();
    let id = state
        .curator
        .create_reblog(
            &ids,
            &req.title,
            req.description.as_deref(),
            &user.identity,
            &req.channel_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Newest reblogs, with a by-month index
pub async fn list_reblogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListReblogsQuery>,
) -> ApiResult<Json<ListReblogsResponse>> {
    let limit = query.limit.min(100); // Cap at 100

    let entries = state.store.list_entries(limit).await?;
    let has_more = limit > 0 && entries.len() == limit;
    let archive = group_by_month(entries.clone())
        .iter()
        .map(ArchiveMonth::from)
        .collect();

    Ok(Json(ListReblogsResponse {
        entries,
        archive,
        has_more,
    }))
}

/// One reblog with its stars and whether the caller starred it
pub async fn get_reblog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<String>,
) -> ApiResult<Json<ReblogDetailResponse>> {
    let entry = find_entry(&state, &entry_id).await?;
    let stars = state.store.list_stars(&entry_id).await?;
    let starred = stars.iter().any(|s| s.user_id == user.id());

    Ok(Json(ReblogDetailResponse {
        entry,
        stars,
        starred,
    }))
}

/// Stars of a reblog, newest first
pub async fn list_reblog_stars(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
) -> ApiResult<Json<Vec<Star>>> {
    find_entry(&state, &entry_id).await?;
    let stars = state.store.list_stars(&entry_id).await?;
    Ok(Json(stars))
}

async fn find_entry(state: &AppState, entry_id: &str) -> ApiResult<ReblogEntry> {
    state
        .store
        .get_entry(entry_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("reblog entry {}", entry_id)))
}
