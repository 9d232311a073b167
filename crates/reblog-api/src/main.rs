use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reblog_api::{build_router, config::Config, state::AppState};
use reblog_discord::{CachingSource, CountingObserver, DiscordClient, MessageSource, ResultCache};
use reblog_persist::ReblogStoreBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting reblog API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Discord source, optionally behind the result cache
    let stats = Arc::new(CountingObserver::new());
    let client = DiscordClient::new(config.discord_bot_token.clone())?
        .with_base_url(config.discord.api_base.clone())
        .with_observer(stats.clone());
    let client: Arc<dyn MessageSource> = Arc::new(client);

    let (source, cache): (Arc<dyn MessageSource>, Option<Arc<ResultCache>>) = if config.cache.enabled {
        let cache = Arc::new(ResultCache::new(config.cache.ttl()));
        cache.spawn_sweeper(config.cache.sweep_period());
        tracing::info!(ttl_secs = config.cache.ttl_secs, "Result cache enabled");

        let caching = CachingSource::new(client, cache.clone()).with_observer(stats.clone());
        (Arc::new(caching), Some(cache))
    } else {
        (client, None)
    };

    tracing::info!(backend = config.store.backend.as_str(), "Initializing reblog store");
    let store = ReblogStoreBuilder::new()
        .backend(config.store.backend)
        .mongodb_uri(config.mongodb_uri.clone())
        .database(config.store.database.clone())
        .build()
        .await?;

    let mut state = AppState::new(config.clone(), source, store).with_source_stats(stats);
    if let Some(cache) = cache {
        state = state.with_cache(cache);
    }

    let app = build_router(Arc::new(state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
