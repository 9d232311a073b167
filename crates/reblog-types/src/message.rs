use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message snapshot as fetched from Discord.
///
/// Messages are immutable once fetched. Reblog entries embed full copies so
/// that an entry stays readable after the upstream message is edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: Author,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reactions: Vec<ReactionGroup>,
}

impl Message {
    /// Numeric snowflake value, if the id is a plain unsigned integer.
    pub fn snowflake(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .map(|m| m.starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Reactions on a message grouped by emoji identity.
///
/// `emoji_key` is the custom emoji id when there is one, otherwise the emoji
/// name (the unicode glyph for standard emoji).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionGroup {
    pub emoji_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_id: Option<String>,
    pub emoji_name: String,
    pub count: u32,
    #[serde(default)]
    pub users: Vec<ReactionUser>,
}

impl ReactionGroup {
    pub fn is_custom(&self) -> bool {
        self.emoji_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionUser {
    pub id: String,
    pub username: String,
}

/// True when every message is at or after its predecessor.
///
/// Snowflake ids are compared when both parse, timestamps otherwise.
pub fn is_chronological(messages: &[Message]) -> bool {
    messages.windows(2).all(|pair| {
        match (pair[0].snowflake(), pair[1].snowflake()) {
            (Some(a), Some(b)) => a <= b,
            _ => pair[0].created_at <= pair[1].created_at,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn msg(id: &str, minute: u32) -> Message {
        Message {
            id: id.to_string(),
            channel_id: "c".to_string(),
            author: Author {
                id: "u".to_string(),
                display_name: "user".to_string(),
                avatar: None,
            },
            content: String::new(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 2, 12, minute, 0).unwrap(),
            attachments: vec![],
            reactions: vec![],
        }
    }

    #[test]
    fn test_is_chronological_by_snowflake() {
        let ordered = vec![msg("998", 0), msg("999", 1), msg("1000", 2)];
        assert!(is_chronological(&ordered));

        let tail_swapped = vec![msg("1000", 2), msg("1002", 4), msg("1001", 3)];
        assert!(!is_chronological(&tail_swapped));
    }

    #[test]
    fn test_is_chronological_falls_back_to_timestamp() {
        let ordered = vec![msg("a", 0), msg("b", 5)];
        assert!(is_chronological(&ordered));
        let reversed = vec![msg("b", 5), msg("a", 0)];
        assert!(!is_chronological(&reversed));
    }

    #[test]
    fn test_attachment_is_image() {
        let png = Attachment {
            filename: "cat.png".to_string(),
            url: "https://cdn.example/cat.png".to_string(),
            mime_type: Some("image/png".to_string()),
        };
        let zip = Attachment {
            mime_type: None,
            ..png.clone()
        };
        assert!(png.is_image());
        assert!(!zip.is_image());
    }
}
