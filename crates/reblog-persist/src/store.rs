use async_trait::async_trait;
use reblog_types::{Message, ReblogEntry, Star, UserIdentity};

use crate::error::{PersistError, Result};

/// Storage for reblog entries and their stars
///
/// Implementations keep two invariants:
/// - at most one star per (entry, user), enforced by the store itself
/// - an entry's `star_count` is always rewritten from a fresh count of its
///   star rows, never incremented in place
#[async_trait]
pub trait ReblogStore: Send + Sync {
    /// Short backend label for health output and logs
    fn backend_name(&self) -> &'static str;

    /// Persist a new entry with `star_count = 0`, returning its id
    async fn create_entry(
        &self,
        title: &str,
        description: Option<&str>,
        messages: Vec<Message>,
        creator: &UserIdentity,
    ) -> Result<String>;

    async fn get_entry(&self, entry_id: &str) -> Result<Option<ReblogEntry>>;

    /// Newest entries first
    async fn list_entries(&self, limit: usize) -> Result<Vec<ReblogEntry>>;

    /// Star an entry for a user. Returns the existing star id when the user
    /// already starred it.
    async fn add_star(&self, entry_id: &str, user: &UserIdentity) -> Result<String>;

    /// Remove the user's star; a missing star is not an error
    async fn remove_star(&self, entry_id: &str, user_id: &str) -> Result<()>;

    /// Stars of an entry, newest first
    async fn list_stars(&self, entry_id: &str) -> Result<Vec<Star>>;

    async fn get_user_star(&self, entry_id: &str, user_id: &str) -> Result<Option<Star>>;

    /// Entries the user starred, most recently starred first. Entries that no
    /// longer exist are skipped.
    async fn list_starred_entries(&self, user_id: &str) -> Result<Vec<ReblogEntry>>;

    /// Rewrite `star_count` from the star rows and return the new value
    async fn recompute_star_count(&self, entry_id: &str) -> Result<u64>;
}

/// Reject blank titles and empty message lists
pub fn validate_new_entry(title: &str, messages: &[Message]) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PersistError::Validation("title must not be empty".to_string()));
    }
    if messages.is_empty() {
        return Err(PersistError::Validation(
            "an entry needs at least one message".to_string(),
        ));
    }
    Ok(())
}

/// Trimmed description, with blank input stored as absent
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
