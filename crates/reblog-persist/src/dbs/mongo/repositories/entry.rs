use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection};

use crate::dbs::mongo::models::MongoReblogEntry;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoEntryRepository {
    collection: Collection<MongoReblogEntry>,
}

impl MongoEntryRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("reblog_entries");
        Self { collection }
    }

    pub async fn insert(&self, entry: &MongoReblogEntry) -> Result<()> {
        self.collection.insert_one(entry).await?;
        Ok(())
    }

    pub async fn get(&self, entry_id: ObjectId) -> Result<Option<MongoReblogEntry>> {
        let filter = doc! { "_id": entry_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn exists(&self, entry_id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": entry_id };
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    /// Newest first
    pub async fn list(&self, limit: i64) -> Result<Vec<MongoReblogEntry>> {
        let entries = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }

    pub async fn get_many(&self, entry_ids: &[ObjectId]) -> Result<Vec<MongoReblogEntry>> {
        let filter = doc! { "_id": { "$in": entry_ids.to_vec() } };
        let entries = self.collection.find(filter).await?.try_collect().await?;
        Ok(entries)
    }

    /// Single-document `$set` of the denormalized counter
    pub async fn set_star_count(&self, entry_id: ObjectId, count: u64) -> Result<()> {
        let filter = doc! { "_id": entry_id };
        let update = doc! { "$set": { "star_count": count as i64 } };
        self.collection.update_one(filter, update).await?;
        Ok(())
    }
}
