use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reblog_types::{Creator, Message, ReblogEntry, Star, UserIdentity};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::store::{normalize_description, validate_new_entry, ReblogStore};

#[derive(Default)]
struct MemoryState {
    // insertion order
    entries: Vec<ReblogEntry>,
    stars: Vec<Star>,
}

impl MemoryState {
    fn entry_mut(&mut self, entry_id: &str) -> Option<&mut ReblogEntry> {
        self.entries.iter_mut().find(|e| e.id == entry_id)
    }

    fn recompute(&mut self, entry_id: &str) -> Result<u64> {
        let count = self.stars.iter().filter(|s| s.entry_id == entry_id).count() as u64;
        let entry = self
            .entry_mut(entry_id)
            .ok_or_else(|| PersistError::EntryNotFound(entry_id.to_string()))?;
        entry.star_count = count;
        Ok(count)
    }
}

/// Process-local store for development and tests
///
/// The star existence check and insert happen under one write lock, which is
/// what makes (entry, user) unique here.
#[derive(Default)]
pub struct InMemoryReblogStore {
    state: RwLock<MemoryState>,
}

impl InMemoryReblogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; among equal timestamps the later insert wins
fn newest_first<T>(
    items: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut sorted: Vec<T> = items.rev().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

#[async_trait]
impl ReblogStore for InMemoryReblogStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_entry(
        &self,
        title: &str,
        description: Option<&str>,
        messages: Vec<Message>,
        creator: &UserIdentity,
    ) -> Result<String> {
        validate_new_entry(title, &messages)?;

        let entry = ReblogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            description: normalize_description(description),
            created_at: Utc::now(),
            created_by: Creator::from(creator),
            messages,
            star_count: 0,
        };
        let id = entry.id.clone();

        self.state.write().await.entries.push(entry);
        tracing::info!(entry_id = %id, backend = "memory", "Created reblog entry");
        Ok(id)
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<ReblogEntry>> {
        let state = self.state.read().await;
        Ok(state.entries.iter().find(|e| e.id == entry_id).cloned())
    }

    async fn list_entries(&self, limit: usize) -> Result<Vec<ReblogEntry>> {
        let state = self.state.read().await;
        let mut entries = newest_first(state.entries.iter().cloned(), |e| e.created_at);
        entries.truncate(limit);
        Ok(entries)
    }

    async fn add_star(&self, entry_id: &str, user: &UserIdentity) -> Result<String> {
        let mut state = self.state.write().await;

        if !state.entries.iter().any(|e| e.id == entry_id) {
            return Err(PersistError::EntryNotFound(entry_id.to_string()));
        }

        if let Some(existing) = state
            .stars
            .iter()
            .find(|s| s.entry_id == entry_id && s.user_id == user.id)
        {
            return Ok(existing.id.clone());
        }

        let star = Star {
            id: uuid::Uuid::new_v4().to_string(),
            entry_id: entry_id.to_string(),
            user_id: user.id.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            created_at: Utc::now(),
        };
        let star_id = star.id.clone();
        state.stars.push(star);

        let count = state.recompute(entry_id)?;
        tracing::info!(entry_id = %entry_id, user_id = %user.id, star_count = count, "Added star");
        Ok(star_id)
    }

    async fn remove_star(&self, entry_id: &str, user_id: &str) -> Result<()> {
        let mut state = self.state.write().await;

        let before = state.stars.len();
        state
            .stars
            .retain(|s| !(s.entry_id == entry_id && s.user_id == user_id));
        if state.stars.len() == before {
            return Ok(());
        }

        match state.recompute(entry_id) {
            Ok(count) => {
                tracing::info!(entry_id = %entry_id, user_id = %user_id, star_count = count, "Removed star");
                Ok(())
            }
            // dangling star on a vanished entry: nothing left to count
            Err(PersistError::EntryNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn list_stars(&self, entry_id: &str) -> Result<Vec<Star>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state.stars.iter().filter(|s| s.entry_id == entry_id).cloned(),
            |s| s.created_at,
        ))
    }

    async fn get_user_star(&self, entry_id: &str, user_id: &str) -> Result<Option<Star>> {
        let state = self.state.read().await;
        Ok(state
            .stars
            .iter()
            .find(|s| s.entry_id == entry_id && s.user_id == user_id)
            .cloned())
    }

    async fn list_starred_entries(&self, user_id: &str) -> Result<Vec<ReblogEntry>> {
        let state = self.state.read().await;
        let stars = newest_first(
            state.stars.iter().filter(|s| s.user_id == user_id).cloned(),
            |s| s.created_at,
        );

        Ok(stars
            .iter()
            .filter_map(|star| state.entries.iter().find(|e| e.id == star.entry_id).cloned())
            .collect())
    }

    async fn recompute_star_count(&self, entry_id: &str) -> Result<u64> {
        self.state.write().await.recompute(entry_id)
    }
}
