use async_trait::async_trait;
use reblog_types::{Channel, Message, ReactionGroup};
use std::sync::Arc;

use crate::cache::{CacheValue, ResultCache};
use crate::error::Result;
use crate::observer::{NoopObserver, SourceObserver};
use crate::traits::{Direction, MessageSource};

/// Read-through cache in front of another [`MessageSource`].
///
/// Single messages, guild channel lists and reaction groups are cached.
/// Directional and latest listings always go to the inner source, and the
/// messages they return seed the per-message entries.
pub struct CachingSource {
    inner: Arc<dyn MessageSource>,
    cache: Arc<ResultCache>,
    observer: Arc<dyn SourceObserver>,
}

impl CachingSource {
    pub fn new(inner: Arc<dyn MessageSource>, cache: Arc<ResultCache>) -> Self {
        Self {
            inner,
            cache,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SourceObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn lookup<T>(&self, key: &str, get: impl FnOnce(&ResultCache, &str) -> Option<T>) -> Option<T> {
        let found = get(&self.cache, key);
        if found.is_some() {
            self.observer.on_cache_hit(key);
        } else {
            self.observer.on_cache_miss(key);
        }
        found
    }

    fn seed(&self, messages: &[Message]) {
        for message in messages {
            self.cache.put(
                ResultCache::message_key(&message.channel_id, &message.id),
                CacheValue::Message(message.clone()),
            );
        }
    }

    async fn plain_message(&self, channel_id: &str, message_id: &str) -> Result<Message> {
        let key = ResultCache::message_key(channel_id, message_id);
        if let Some(message) = self.lookup(&key, ResultCache::get_message) {
            return Ok(message);
        }

        let message = self.inner.fetch_message(channel_id, message_id, false).await?;
        self.cache.put(key, CacheValue::Message(message.clone()));
        Ok(message)
    }
}

#[async_trait]
impl MessageSource for CachingSource {
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
        include_reactions: bool,
    ) -> Result<Message> {
        let mut message = self.plain_message(channel_id, message_id).await?;

        // grouping only ever covers emojis in the inline summary
        if include_reactions && !message.reactions.is_empty() {
            message.reactions = self.fetch_reactions(channel_id, message_id).await?;
        }

        Ok(message)
    }

    async fn fetch_directional(
        &self,
        channel_id: &str,
        reference_id: &str,
        direction: Direction,
        limit: u32,
        cursor_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        let messages = self
            .inner
            .fetch_directional(channel_id, reference_id, direction, limit, cursor_id)
            .await?;
        self.seed(&messages);
        Ok(messages)
    }

    async fn fetch_latest(&self, channel_id: &str, limit: u32) -> Result<Vec<Message>> {
        let messages = self.inner.fetch_latest(channel_id, limit).await?;
        self.seed(&messages);
        Ok(messages)
    }

    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<Channel>> {
        let key = ResultCache::guild_channels_key(guild_id);
        if let Some(channels) = self.lookup(&key, ResultCache::get_channels) {
            return Ok(channels);
        }

        let channels = self.inner.fetch_channels(guild_id).await?;
        self.cache.put(key, CacheValue::Channels(channels.clone()));
        Ok(channels)
    }

    async fn fetch_reactions(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Vec<ReactionGroup>> {
        let key = ResultCache::reaction_key(channel_id, message_id, None);
        if let Some(groups) = self.lookup(&key, ResultCache::get_reactions) {
            return Ok(groups);
        }

        let groups = self.inner.fetch_reactions(channel_id, message_id).await?;
        self.cache.put(key, CacheValue::Reactions(groups.clone()));
        Ok(groups)
    }
}
