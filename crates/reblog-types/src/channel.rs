use serde::{Deserialize, Serialize};

/// Discord channel type code for guild text channels.
pub const TEXT_CHANNEL_TYPE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl Channel {
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_CHANNEL_TYPE
    }
}
