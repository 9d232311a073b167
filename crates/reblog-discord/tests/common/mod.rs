use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use reblog_discord::{Direction, MessageSource, Result, SourceError};
use reblog_types::{Author, Channel, Message, ReactionGroup, ReactionUser};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory channel history with numeric ids, one minute apart.
pub struct ScriptedSource {
    pub messages: Vec<Message>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn with_ids(range: std::ops::RangeInclusive<u64>) -> Self {
        let base = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        let messages = range
            .map(|n| Message {
                id: n.to_string(),
                channel_id: "c1".to_string(),
                author: Author {
                    id: "u1".to_string(),
                    display_name: "user1".to_string(),
                    avatar: None,
                },
                content: format!("message {}", n),
                created_at: base + Duration::minutes(n as i64),
                attachments: vec![],
                reactions: vec![ReactionGroup {
                    emoji_key: "👍".to_string(),
                    emoji_id: None,
                    emoji_name: "👍".to_string(),
                    count: 1,
                    users: vec![],
                }],
            })
            .collect();
        Self {
            messages,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn fetch_message(
        &self,
        _channel_id: &str,
        message_id: &str,
        include_reactions: bool,
    ) -> Result<Message> {
        self.hit();
        let mut message = self
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(message_id.to_string()))?;
        if include_reactions {
            message.reactions[0].users = vec![ReactionUser {
                id: "u9".to_string(),
                username: "fan".to_string(),
            }];
        }
        Ok(message)
    }

    async fn fetch_directional(
        &self,
        _channel_id: &str,
        reference_id: &str,
        direction: Direction,
        limit: u32,
        cursor_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        self.hit();
        let anchor: u64 = cursor_id.unwrap_or(reference_id).parse().unwrap();
        let limit = limit as usize;
        let page: Vec<Message> = match direction {
            Direction::Before => {
                let older: Vec<Message> = self
                    .messages
                    .iter()
                    .filter(|m| m.snowflake().unwrap() < anchor)
                    .cloned()
                    .collect();
                let skip = older.len().saturating_sub(limit);
                older.into_iter().skip(skip).collect()
            }
            Direction::After => self
                .messages
                .iter()
                .filter(|m| m.snowflake().unwrap() > anchor)
                .take(limit)
                .cloned()
                .collect(),
        };
        Ok(page)
    }

    async fn fetch_latest(&self, _channel_id: &str, limit: u32) -> Result<Vec<Message>> {
        self.hit();
        let skip = self.messages.len().saturating_sub(limit as usize);
        Ok(self.messages.iter().skip(skip).cloned().collect())
    }

    async fn fetch_channels(&self, _guild_id: &str) -> Result<Vec<Channel>> {
        self.hit();
        Ok(vec![Channel {
            id: "c1".to_string(),
            name: "general".to_string(),
            kind: 0,
            parent_id: None,
            position: Some(0),
        }])
    }

    async fn fetch_reactions(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Vec<ReactionGroup>> {
        Ok(self
            .fetch_message(channel_id, message_id, true)
            .await?
            .reactions)
    }
}
