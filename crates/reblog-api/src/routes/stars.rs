use axum::{extract::State, Extension, Json};
use reblog_types::ReblogEntry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::ApiResult, middleware::identity::CurrentUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub entry_id: String,
}

#[derive(Debug, Serialize)]
pub struct StarResponse {
    pub id: String,
    pub star_count: u64,
}

#[derive(Debug, Serialize)]
pub struct StarredResponse {
    pub entries: Vec<ReblogEntry>,
}

/// Star a reblog for the caller (idempotent)
pub async fn add_star(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<StarRequest>,
) -> ApiResult<Json<StarResponse>> {
    let id = state.store.add_star(&req.entry_id, &user.identity).await?;
    let star_count = state
        .store
        .get_entry(&req.entry_id)
        .await?
        .map(|e| e.star_count)
        .unwrap_or_default();

    Ok(Json(StarResponse { id, star_count }))
}

/// Remove the caller's star; removing an absent star succeeds
pub async fn remove_star(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<StarRequest>,
) -> ApiResult<Json<Value>> {
    state.store.remove_star(&req.entry_id, user.id()).await?;
    Ok(Json(json!({ "success": true })))
}

/// Reblogs the caller starred, most recently starred first
pub async fn my_stars(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<StarredResponse>> {
    let entries = state.store.list_starred_entries(user.id()).await?;
    Ok(Json(StarredResponse { entries }))
}
