use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection, IndexModel};

use crate::dbs::mongo::models::MongoStar;
use crate::error::Result;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStarRepository {
    collection: Collection<MongoStar>,
}

impl MongoStarRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("stars");
        Self { collection }
    }

    /// Unique (entry_id, user_id) plus the per-user listing index
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique_pair = IndexModel::builder()
            .keys(doc! { "entry_id": 1, "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("entry_user_unique".to_string())
                    .build(),
            )
            .build();
        let by_user = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();

        self.collection
            .create_indexes(vec![unique_pair, by_user])
            .await?;
        Ok(())
    }

    /// Insert a star. `Ok(false)` when the unique index rejected it.
    pub async fn insert(&self, star: &MongoStar) -> Result<bool> {
        match self.collection.insert_one(star).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_for_user(&self, entry_id: ObjectId, user_id: &str) -> Result<Option<MongoStar>> {
        let filter = doc! { "entry_id": entry_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Returns whether a star was deleted
    pub async fn delete_for_user(&self, entry_id: ObjectId, user_id: &str) -> Result<bool> {
        let filter = doc! { "entry_id": entry_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count_for_entry(&self, entry_id: ObjectId) -> Result<u64> {
        let filter = doc! { "entry_id": entry_id };
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Newest first
    pub async fn list_for_entry(&self, entry_id: ObjectId) -> Result<Vec<MongoStar>> {
        let stars = self
            .collection
            .find(doc! { "entry_id": entry_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(stars)
    }

    /// Newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<MongoStar>> {
        let stars = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(stars)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
