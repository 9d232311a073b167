use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{identity, logging},
    routes::{channels, health, links, messages, reblogs, stars},
    state::AppState,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn build_router(state: Arc<AppState>) -> Router {
    // Everything under /api needs an identity
    let api_routes = Router::new()
        // Channels
        .route("/channels", get(channels::list_channels))
        .route("/channels/:channel_id/latest", get(channels::latest_messages))
        // Links
        .route("/links/resolve", post(links::resolve_link))
        // Message windows
        .route("/messages/:channel_id/:message_id", get(messages::get_window))
        .route("/messages/:channel_id/:message_id/before", get(messages::extend_before))
        .route("/messages/:channel_id/:message_id/after", get(messages::extend_after))
        // Reblogs
        .route("/reblogs", post(reblogs::create_reblog).get(reblogs::list_reblogs))
        .route("/reblogs/:entry_id", get(reblogs::get_reblog))
        .route("/reblogs/:entry_id/stars", get(reblogs::list_reblog_stars))
        // Stars
        .route("/stars", post(stars::add_star).delete(stars::remove_star))
        .route("/stars/mine", get(stars::my_stars))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity::require_identity,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
