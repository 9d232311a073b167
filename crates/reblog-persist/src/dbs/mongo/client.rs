use async_trait::async_trait;
use chrono::Utc;
use mongodb::{bson::oid::ObjectId, Client};
use reblog_types::{Creator, Message, ReblogEntry, Star, UserIdentity};
use std::collections::HashMap;

use crate::dbs::mongo::models::{MongoReblogEntry, MongoStar};
use crate::dbs::mongo::repositories::{MongoEntryRepository, MongoStarRepository};
use crate::error::{PersistError, Result};
use crate::store::{normalize_description, validate_new_entry, ReblogStore};

/// MongoDB-backed store
///
/// `(entry_id, user_id)` uniqueness comes from a unique index on the stars
/// collection; a losing concurrent insert reads back the winner's star.
pub struct MongoReblogStore {
    entry_repo: MongoEntryRepository,
    star_repo: MongoStarRepository,
}

impl MongoReblogStore {
    /// Connect to MongoDB and make sure the star indexes exist
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let store = Self {
            entry_repo: MongoEntryRepository::new(&client, database),
            star_repo: MongoStarRepository::new(&client, database),
        };
        store.star_repo.ensure_indexes().await?;

        tracing::info!(database = %database, "Connected to MongoDB reblog store");
        Ok(store)
    }
}

/// Ids we never issued cannot name a stored document
fn parse_id(entry_id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(entry_id).ok()
}

#[async_trait]
impl ReblogStore for MongoReblogStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn create_entry(
        &self,
        title: &str,
        description: Option<&str>,
        messages: Vec<Message>,
        creator: &UserIdentity,
    ) -> Result<String> {
        validate_new_entry(title, &messages)?;

        let entry = MongoReblogEntry {
            id: ObjectId::new(),
            title: title.trim().to_string(),
            description: normalize_description(description),
            created_at: Utc::now(),
            created_by: Creator::from(creator),
            messages,
            star_count: 0,
        };
        self.entry_repo.insert(&entry).await?;

        let id = entry.id.to_hex();
        tracing::info!(entry_id = %id, backend = "mongodb", "Created reblog entry");
        Ok(id)
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<ReblogEntry>> {
        let Some(object_id) = parse_id(entry_id) else {
            return Ok(None);
        };
        Ok(self.entry_repo.get(object_id).await?.map(Into::into))
    }

    async fn list_entries(&self, limit: usize) -> Result<Vec<ReblogEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = self.entry_repo.list(limit).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn add_star(&self, entry_id: &str, user: &UserIdentity) -> Result<String> {
        let object_id = parse_id(entry_id)
            .ok_or_else(|| PersistError::EntryNotFound(entry_id.to_string()))?;
        if !self.entry_repo.exists(object_id).await? {
            return Err(PersistError::EntryNotFound(entry_id.to_string()));
        }

        if let Some(existing) = self.star_repo.find_for_user(object_id, &user.id).await? {
            return Ok(existing.id.to_hex());
        }

        let star = MongoStar {
            id: ObjectId::new(),
            entry_id: object_id,
            user_id: user.id.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            created_at: Utc::now(),
        };

        let star_id = if self.star_repo.insert(&star).await? {
            star.id.to_hex()
        } else {
            // lost the race against a concurrent insert for the same pair
            self.star_repo
                .find_for_user(object_id, &user.id)
                .await?
                .map(|s| s.id.to_hex())
                .ok_or_else(|| {
                    PersistError::Internal(format!(
                        "star for {} by {} rejected as duplicate but not found",
                        entry_id, user.id
                    ))
                })?
        };

        let count = self.recompute_star_count(entry_id).await?;
        tracing::info!(entry_id = %entry_id, user_id = %user.id, star_count = count, "Added star");
        Ok(star_id)
    }

    async fn remove_star(&self, entry_id: &str, user_id: &str) -> Result<()> {
        let Some(object_id) = parse_id(entry_id) else {
            return Ok(());
        };

        if !self.star_repo.delete_for_user(object_id, user_id).await? {
            return Ok(());
        }

        let count = self.recompute_star_count(entry_id).await?;
        tracing::info!(entry_id = %entry_id, user_id = %user_id, star_count = count, "Removed star");
        Ok(())
    }

    async fn list_stars(&self, entry_id: &str) -> Result<Vec<Star>> {
        let Some(object_id) = parse_id(entry_id) else {
            return Ok(Vec::new());
        };
        let stars = self.star_repo.list_for_entry(object_id).await?;
        Ok(stars.into_iter().map(Into::into).collect())
    }

    async fn get_user_star(&self, entry_id: &str, user_id: &str) -> Result<Option<Star>> {
        let Some(object_id) = parse_id(entry_id) else {
            return Ok(None);
        };
        Ok(self
            .star_repo
            .find_for_user(object_id, user_id)
            .await?
            .map(Into::into))
    }

    async fn list_starred_entries(&self, user_id: &str) -> Result<Vec<ReblogEntry>> {
        let stars = self.star_repo.list_for_user(user_id).await?;
        if stars.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ObjectId> = stars.iter().map(|s| s.entry_id).collect();
        let mut by_id: HashMap<ObjectId, MongoReblogEntry> = self
            .entry_repo
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        // keep star order; `$in` returns documents in natural order
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(Into::into)
            .collect())
    }

    async fn recompute_star_count(&self, entry_id: &str) -> Result<u64> {
        let object_id = parse_id(entry_id)
            .ok_or_else(|| PersistError::EntryNotFound(entry_id.to_string()))?;
        let count = self.star_repo.count_for_entry(object_id).await?;
        self.entry_repo.set_star_count(object_id, count).await?;
        Ok(count)
    }
}
