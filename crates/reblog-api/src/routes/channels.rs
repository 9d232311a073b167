use axum::{
    extract::{Path, Query, State},
    Json,
};
use reblog_types::{Channel, Message};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ChannelsResponse {
    pub guild_id: String,
    pub channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub channel_id: String,
    pub messages: Vec<Message>,
}

/// Text channels of the configured guild
pub async fn list_channels(State(state): State<Arc<AppState>>) -> ApiResult<Json<ChannelsResponse>> {
    let guild_id = state.config.discord.guild_id.trim();
    if guild_id.is_empty() {
        return Err(ApiError::NotFound("no guild configured".to_string()));
    }

    let channels = state.source.fetch_channels(guild_id).await?;

    Ok(Json(ChannelsResponse {
        guild_id: guild_id.to_string(),
        channels,
    }))
}

/// Most recent messages of a channel, oldest first
pub async fn latest_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    Query(query): Query<LatestQuery>,
) -> ApiResult<Json<LatestResponse>> {
    let limit = state.config.discord.page_limit(query.limit);
    let messages = state.source.fetch_latest(&channel_id, limit).await?;

    Ok(Json(LatestResponse {
        channel_id,
        messages,
    }))
}
