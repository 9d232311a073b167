use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Diagnostics hook for remote calls and cache lookups.
///
/// Injected into the client and the caching layer so counters belong to one
/// source instance instead of the process.
pub trait SourceObserver: Send + Sync {
    fn on_api_call(&self, _endpoint: &str) {}

    fn on_cache_hit(&self, _key: &str) {}

    fn on_cache_miss(&self, _key: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SourceObserver for NoopObserver {}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub api_calls: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Observer keeping simple counters.
#[derive(Debug, Default)]
pub struct CountingObserver {
    api_calls: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            api_calls: self.api_calls.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}

impl SourceObserver for CountingObserver {
    fn on_api_call(&self, endpoint: &str) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(endpoint = %endpoint, "Discord API call");
    }

    fn on_cache_hit(&self, key: &str) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(key = %key, "Cache hit");
    }

    fn on_cache_miss(&self, key: &str) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(key = %key, "Cache miss");
    }
}
