use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::user::UserIdentity;

/// A curated, titled collection of message snapshots.
///
/// Everything except `star_count` is fixed at creation. `star_count` is a
/// denormalized copy of the number of [`Star`] rows pointing at the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReblogEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Creator,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub star_count: u64,
}

/// Snapshot of the user who created an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub user_id: String,
    pub username: String,
}

impl From<&UserIdentity> for Creator {
    fn from(user: &UserIdentity) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub id: String,
    pub entry_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}
