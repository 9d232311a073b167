use async_trait::async_trait;
use reblog_types::{Channel, Message, ReactionGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Pagination direction relative to an anchor message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Before,
    After,
}

impl Direction {
    /// Query parameter name Discord uses for this direction.
    pub fn as_query_key(&self) -> &'static str {
        match self {
            Direction::Before => "before",
            Direction::After => "after",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_key())
    }
}

/// Read access to a remote chat history.
///
/// Every listing operation returns messages oldest first, whatever order the
/// remote side uses.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch one message.
    ///
    /// With `include_reactions`, the inline reaction summary is replaced by
    /// the grouped result of [`MessageSource::fetch_reactions`].
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
        include_reactions: bool,
    ) -> Result<Message>;

    /// Fetch up to `limit` messages strictly before or after an anchor.
    ///
    /// `cursor_id` replaces `reference_id` as the anchor when present, so a
    /// caller can keep paging from the edge of what it already shows.
    async fn fetch_directional(
        &self,
        channel_id: &str,
        reference_id: &str,
        direction: Direction,
        limit: u32,
        cursor_id: Option<&str>,
    ) -> Result<Vec<Message>>;

    /// Fetch the newest `limit` messages of a channel.
    async fn fetch_latest(&self, channel_id: &str, limit: u32) -> Result<Vec<Message>>;

    /// List the text channels of a guild. Order is unspecified.
    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<Channel>>;

    /// Reactions on a message grouped by emoji, with the reacting users.
    async fn fetch_reactions(&self, channel_id: &str, message_id: &str)
        -> Result<Vec<ReactionGroup>>;
}
