// Discord REST payloads and their conversion into domain types

use chrono::{DateTime, Utc};
use reblog_types::{Attachment, Author, Channel, Message, ReactionGroup, ReactionUser};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordMessage {
    pub id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: DiscordUser,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<DiscordAttachment>,
    #[serde(default)]
    pub reactions: Vec<DiscordReaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordUser {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub global_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordAttachment {
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordReaction {
    #[serde(default)]
    pub count: u32,
    pub emoji: DiscordEmoji,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordEmoji {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl DiscordEmoji {
    /// Path form used by the reactions endpoint: `name:id` for custom emoji,
    /// the bare glyph otherwise.
    pub fn path_segment(&self) -> Option<String> {
        match (&self.id, &self.name) {
            (Some(id), Some(name)) => Some(format!("{}:{}", name, id)),
            (Some(id), None) => Some(format!("_:{}", id)),
            (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiscordChannel {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: u8,
    pub parent_id: Option<String>,
    pub position: Option<i32>,
}

impl From<DiscordUser> for ReactionUser {
    fn from(user: DiscordUser) -> Self {
        Self {
            id: user.id,
            username: user.global_name.unwrap_or(user.username),
        }
    }
}

impl DiscordMessage {
    pub fn into_message(self, fallback_channel_id: &str) -> Message {
        let channel_id = if self.channel_id.is_empty() {
            fallback_channel_id.to_string()
        } else {
            self.channel_id
        };

        let reactions = self
            .reactions
            .into_iter()
            .filter_map(|r| {
                let emoji_name = r.emoji.name.clone().unwrap_or_default();
                let emoji_key = r.emoji.id.clone().or_else(|| r.emoji.name.clone())?;
                Some(ReactionGroup {
                    emoji_key,
                    emoji_id: r.emoji.id,
                    emoji_name,
                    count: r.count,
                    users: Vec::new(),
                })
            })
            .collect();

        Message {
            id: self.id,
            channel_id,
            author: Author {
                id: self.author.id,
                display_name: self.author.global_name.unwrap_or(self.author.username),
                avatar: self.author.avatar,
            },
            content: self.content,
            created_at: self.timestamp,
            attachments: self
                .attachments
                .into_iter()
                .map(|a| Attachment {
                    filename: a.filename,
                    url: a.url,
                    mime_type: a.content_type,
                })
                .collect(),
            reactions,
        }
    }
}

impl From<DiscordChannel> for Channel {
    fn from(channel: DiscordChannel) -> Self {
        Self {
            id: channel.id,
            name: channel.name.unwrap_or_default(),
            kind: channel.kind,
            parent_id: channel.parent_id,
            position: channel.position,
        }
    }
}
