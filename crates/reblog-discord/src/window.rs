use reblog_types::{is_chronological, Message};
use serde::Serialize;
use std::sync::Arc;

use crate::client::MAX_PAGE_LIMIT;
use crate::error::Result;
use crate::traits::{Direction, MessageSource};

pub const DEFAULT_HALF_WIDTH: u32 = 5;

/// Chronological slice of a channel around a focal message.
#[derive(Debug, Clone, Serialize)]
pub struct ContextWindow {
    pub focal_id: String,
    pub messages: Vec<Message>,
    /// False once the "before" side came back short.
    pub has_more_before: bool,
    /// False once the "after" side came back short.
    pub has_more_after: bool,
}

impl ContextWindow {
    pub fn focal_index(&self) -> Option<usize> {
        self.messages.iter().position(|m| m.id == self.focal_id)
    }

    pub fn earliest_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }

    pub fn latest_id(&self) -> Option<&str> {
        self.messages.last().map(|m| m.id.as_str())
    }
}

/// One incremental page for a displayed window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowSlice {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

impl WindowSlice {
    fn from_page(messages: Vec<Message>, limit: u32) -> Self {
        let has_more = page_is_full(&messages, limit);
        Self { messages, has_more }
    }
}

/// A short or empty page means that direction is exhausted for now.
/// `limit` must already be clamped to what the source serves.
fn page_is_full(messages: &[Message], limit: u32) -> bool {
    !messages.is_empty() && messages.len() >= limit as usize
}

/// Builds context windows from separate before/self/after fetches.
///
/// Holds no state between requests.
pub struct ContextWindowAssembler {
    source: Arc<dyn MessageSource>,
    default_half_width: u32,
}

impl ContextWindowAssembler {
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self {
            source,
            default_half_width: DEFAULT_HALF_WIDTH,
        }
    }

    pub fn with_half_width(mut self, half_width: u32) -> Self {
        self.default_half_width = half_width;
        self
    }

    pub fn default_half_width(&self) -> u32 {
        self.default_half_width
    }

    /// `before ++ [focal] ++ after`, oldest first.
    ///
    /// Both directional batches already arrive oldest first from the source,
    /// so plain concatenation keeps the whole window chronological.
    pub async fn build_initial_window(
        &self,
        channel_id: &str,
        focal_id: &str,
        half_width: Option<u32>,
    ) -> Result<ContextWindow> {
        let half_width = half_width
            .unwrap_or(self.default_half_width)
            .min(MAX_PAGE_LIMIT);

        let before = self
            .source
            .fetch_directional(channel_id, focal_id, Direction::Before, half_width, None)
            .await?;
        let focal = self.source.fetch_message(channel_id, focal_id, false).await?;
        let after = self
            .source
            .fetch_directional(channel_id, focal_id, Direction::After, half_width, None)
            .await?;

        let has_more_before = page_is_full(&before, half_width);
        let has_more_after = page_is_full(&after, half_width);

        let mut messages = Vec::with_capacity(before.len() + 1 + after.len());
        messages.extend(before);
        messages.push(focal);
        messages.extend(after);

        if !is_chronological(&messages) {
            tracing::warn!(
                channel_id = %channel_id,
                focal_id = %focal_id,
                "Assembled window is not chronological"
            );
        }

        tracing::debug!(
            channel_id = %channel_id,
            focal_id = %focal_id,
            count = messages.len(),
            "Built context window"
        );

        Ok(ContextWindow {
            focal_id: focal_id.to_string(),
            messages,
            has_more_before,
            has_more_after,
        })
    }

    /// Messages strictly before `earliest_known_id`; the caller prepends them.
    pub async fn extend_before(
        &self,
        channel_id: &str,
        focal_id: &str,
        earliest_known_id: &str,
        limit: u32,
    ) -> Result<WindowSlice> {
        let limit = limit.min(MAX_PAGE_LIMIT);
        let messages = self
            .source
            .fetch_directional(
                channel_id,
                focal_id,
                Direction::Before,
                limit,
                Some(earliest_known_id),
            )
            .await?;
        Ok(WindowSlice::from_page(messages, limit))
    }

    /// Messages strictly after `latest_known_id`; the caller appends them.
    pub async fn extend_after(
        &self,
        channel_id: &str,
        focal_id: &str,
        latest_known_id: &str,
        limit: u32,
    ) -> Result<WindowSlice> {
        let limit = limit.min(MAX_PAGE_LIMIT);
        let messages = self
            .source
            .fetch_directional(
                channel_id,
                focal_id,
                Direction::After,
                limit,
                Some(latest_known_id),
            )
            .await?;
        Ok(WindowSlice::from_page(messages, limit))
    }
}
