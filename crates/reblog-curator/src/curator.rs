use futures::future::try_join_all;
use reblog_discord::MessageSource;
use reblog_persist::ReblogStore;
use reblog_types::{Message, UserIdentity};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{CuratorError, Result};

/// Creates reblog entries from selected message ids
///
/// Every selected message is fetched before anything is written, so a failed
/// fetch leaves the store untouched.
pub struct ReblogCurator {
    source: Arc<dyn MessageSource>,
    store: Arc<dyn ReblogStore>,
}

impl ReblogCurator {
    pub fn new(source: Arc<dyn MessageSource>, store: Arc<dyn ReblogStore>) -> Self {
        Self { source, store }
    }

    pub async fn create_reblog(
        &self,
        selected_ids: &[String],
        title: &str,
        description: Option<&str>,
        creator: &UserIdentity,
        channel_id: &str,
    ) -> Result<String> {
        let ids = normalize_selection(selected_ids);
        if ids.is_empty() {
            return Err(CuratorError::Validation(
                "select at least one message".to_string(),
            ));
        }
        if title.trim().is_empty() {
            return Err(CuratorError::Validation("title must not be empty".to_string()));
        }
        if channel_id.trim().is_empty() {
            return Err(CuratorError::Validation("channel_id is required".to_string()));
        }

        tracing::debug!(
            channel_id = %channel_id,
            count = ids.len(),
            "Fetching selected messages"
        );

        let fetches = ids
            .iter()
            .map(|id| self.source.fetch_message(channel_id, id, true));
        let mut messages: Vec<Message> = try_join_all(fetches).await.map_err(|e| {
            tracing::warn!(channel_id = %channel_id, error = %e, "Aborting reblog, fetch failed");
            CuratorError::Upstream(e)
        })?;

        // stable: equal timestamps keep selection order
        messages.sort_by_key(|m| m.created_at);

        let entry_id = self
            .store
            .create_entry(title, description, messages, creator)
            .await?;
        tracing::info!(
            entry_id = %entry_id,
            user_id = %creator.id,
            count = ids.len(),
            "Created reblog"
        );
        Ok(entry_id)
    }
}

/// Trim ids, drop blanks and repeats. First occurrence wins.
pub fn normalize_selection(selected_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    selected_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}
