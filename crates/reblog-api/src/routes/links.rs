use axum::Json;
use reblog_discord::{parse_message_link, MessageLink};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ResolveLinkRequest {
    pub link: String,
}

/// Turn a pasted message link into channel and message ids
pub async fn resolve_link(Json(req): Json<ResolveLinkRequest>) -> ApiResult<Json<MessageLink>> {
    parse_message_link(&req.link)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(format!("not a Discord message link: {}", req.link)))
}
