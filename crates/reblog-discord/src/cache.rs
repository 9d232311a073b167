// Result cache (in-memory, TTL-based)

use reblog_types::{Channel, Message, ReactionGroup};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Values the source layer caches
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Message(Message),
    Channels(Vec<Channel>),
    Reactions(Vec<ReactionGroup>),
}

#[derive(Debug, Clone)]
struct CachedEntry {
    value: CacheValue,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Simple in-memory cache with TTL
///
/// Stale reads inside the TTL are accepted; nothing here is needed for
/// correctness.
pub struct ResultCache {
    store: RwLock<HashMap<String, CachedEntry>>,
    default_ttl: Duration,
}

impl ResultCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// `message:{channel}:{id}`
    pub fn message_key(channel_id: &str, message_id: &str) -> String {
        format!("message:{}:{}", channel_id, message_id)
    }

    /// `guild-channels:{guild}`
    pub fn guild_channels_key(guild_id: &str) -> String {
        format!("guild-channels:{}", guild_id)
    }

    /// `reaction:{channel}:{id}:{emoji|all}`
    pub fn reaction_key(channel_id: &str, message_id: &str, emoji: Option<&str>) -> String {
        format!(
            "reaction:{}:{}:{}",
            channel_id,
            message_id,
            emoji.unwrap_or("all")
        )
    }

    /// Get a live entry. Expired entries are dropped on the way out.
    pub fn get(&self, key: &str) -> Option<CacheValue> {
        {
            let store = self.store.read().ok()?;
            let cached = store.get(key)?;
            if !cached.is_expired() {
                return Some(cached.value.clone());
            }
        }

        // read lock released above
        self.invalidate(key);
        None
    }

    pub fn get_message(&self, key: &str) -> Option<Message> {
        match self.get(key)? {
            CacheValue::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn get_channels(&self, key: &str) -> Option<Vec<Channel>> {
        match self.get(key)? {
            CacheValue::Channels(channels) => Some(channels),
            _ => None,
        }
    }

    pub fn get_reactions(&self, key: &str) -> Option<Vec<ReactionGroup>> {
        match self.get(key)? {
            CacheValue::Reactions(groups) => Some(groups),
            _ => None,
        }
    }

    /// Store with the default TTL
    pub fn put(&self, key: String, value: CacheValue) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    pub fn put_with_ttl(&self, key: String, value: CacheValue, ttl: Duration) {
        if let Ok(mut store) = self.store.write() {
            store.insert(
                key,
                CachedEntry {
                    value,
                    cached_at: Instant::now(),
                    ttl,
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        if let Ok(mut store) = self.store.write() {
            store.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut store) = self.store.write() {
            store.clear();
        }
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        if let Ok(mut store) = self.store.write() {
            let before = store.len();
            store.retain(|_, v| !v.is_expired());
            before - store.len()
        } else {
            0
        }
    }

    pub fn stats(&self) -> CacheStats {
        if let Ok(store) = self.store.read() {
            let total = store.len();
            let expired = store.values().filter(|v| v.is_expired()).count();

            CacheStats {
                total_entries: total,
                expired_entries: expired,
                active_entries: total - expired,
            }
        } else {
            CacheStats::default()
        }
    }

    /// Periodically purge expired entries on the tokio runtime.
    ///
    /// The task holds a weak reference and ends once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired cache entries");
                }
            }
        })
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}
