use std::sync::Arc;

use reblog_curator::ReblogCurator;
use reblog_discord::{ContextWindowAssembler, CountingObserver, MessageSource, ResultCache};
use reblog_persist::ReblogStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The assembler and curator are stateless and built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn MessageSource>,
    pub store: Arc<dyn ReblogStore>,
    pub assembler: Arc<ContextWindowAssembler>,
    pub curator: Arc<ReblogCurator>,
    pub cache: Option<Arc<ResultCache>>,
    pub source_stats: Arc<CountingObserver>,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn MessageSource>,
        store: Arc<dyn ReblogStore>,
    ) -> Self {
        let assembler = ContextWindowAssembler::new(source.clone())
            .with_half_width(config.discord.window_half_width);
        let curator = ReblogCurator::new(source.clone(), store.clone());

        Self {
            config: Arc::new(config),
            source,
            store,
            assembler: Arc::new(assembler),
            curator: Arc::new(curator),
            cache: None,
            source_stats: Arc::new(CountingObserver::new()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Counters shared with the Discord client and caching layer
    pub fn with_source_stats(mut self, stats: Arc<CountingObserver>) -> Self {
        self.source_stats = stats;
        self
    }
}
