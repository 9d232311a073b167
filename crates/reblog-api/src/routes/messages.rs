use axum::{
    extract::{Path, Query, State},
    Json,
};
use reblog_discord::{ContextWindow, WindowSlice};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub half_width: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BeforeQuery {
    pub before_id: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AfterQuery {
    pub after_id: String,
    pub limit: Option<u32>,
}

/// Initial context window around a focal message
pub async fn get_window(
    State(state): State<Arc<AppState>>,
    Path((channel_id, message_id)): Path<(String, String)>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<ContextWindow>> {
    let half_width = state.config.discord.half_width(query.half_width);
    let window = state
        .assembler
        .build_initial_window(&channel_id, &message_id, Some(half_width))
        .await?;
    Ok(Json(window))
}

/// Older messages to prepend to a displayed window
pub async fn extend_before(
    State(state): State<Arc<AppState>>,
    Path((channel_id, message_id)): Path<(String, String)>,
    Query(query): Query<BeforeQuery>,
) -> ApiResult<Json<WindowSlice>> {
    let limit = state.config.discord.page_limit(query.limit);
    let slice = state
        .assembler
        .extend_before(&channel_id, &message_id, &query.before_id, limit)
        .await?;
    Ok(Json(slice))
}

/// Newer messages to append to a displayed window
pub async fn extend_after(
    State(state): State<Arc<AppState>>,
    Path((channel_id, message_id)): Path<(String, String)>,
    Query(query): Query<AfterQuery>,
) -> ApiResult<Json<WindowSlice>> {
    let limit = state.config.discord.page_limit(query.limit);
    let slice = state
        .assembler
        .extend_after(&channel_id, &message_id, &query.after_id, limit)
        .await?;
    Ok(Json(slice))
}
