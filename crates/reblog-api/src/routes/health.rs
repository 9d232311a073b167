use axum::{extract::State, Json};
use reblog_discord::{CacheStats, SourceStats};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    pub source: SourceStats,
}

/// Health check endpoint
///
/// Liveness plus the configured store backend and source counters
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend_name().to_string(),
        cache: state.cache.as_ref().map(|c| c.stats()),
        source: state.source_stats.stats(),
    })
}
