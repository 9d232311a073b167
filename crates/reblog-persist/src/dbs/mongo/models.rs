use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use reblog_types::{Creator, Message, ReblogEntry, Star};
use serde::{Deserialize, Serialize};

/// MongoDB-specific entry document (ObjectId key, BSON datetime)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoReblogEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub created_by: Creator,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub star_count: i64,
}

/// MongoDB-specific star document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoStar {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub entry_id: ObjectId,
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

// Conversions into the store-agnostic models

impl From<MongoReblogEntry> for ReblogEntry {
    fn from(entry: MongoReblogEntry) -> Self {
        Self {
            id: entry.id.to_hex(),
            title: entry.title,
            description: entry.description,
            created_at: entry.created_at,
            created_by: entry.created_by,
            messages: entry.messages,
            star_count: entry.star_count.max(0) as u64,
        }
    }
}

impl From<MongoStar> for Star {
    fn from(star: MongoStar) -> Self {
        Self {
            id: star.id.to_hex(),
            entry_id: star.entry_id.to_hex(),
            user_id: star.user_id,
            username: star.username,
            avatar: star.avatar,
            created_at: star.created_at,
        }
    }
}
