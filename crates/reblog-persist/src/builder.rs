use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::dbs::memory::InMemoryReblogStore;
use crate::error::{PersistError, Result};
use crate::store::ReblogStore;

/// Which backend a [`ReblogStoreBuilder`] produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    MongoDb,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::MongoDb => "mongodb",
        }
    }
}

pub struct ReblogStoreBuilder {
    backend: StoreBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl ReblogStoreBuilder {
    pub fn new() -> Self {
        Self {
            backend: StoreBackend::Memory,
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn ReblogStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(InMemoryReblogStore::new())),
            StoreBackend::MongoDb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn ReblogStore>> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let store = crate::dbs::mongo::MongoReblogStore::connect(&mongodb_uri, &database).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn ReblogStore>> {
        Err(PersistError::Internal(
            "mongodb backend requested but reblog-persist was built without the `mongodb` feature"
                .to_string(),
        ))
    }
}

impl Default for ReblogStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names_deserialize_lowercase() {
        let backend: StoreBackend = serde_json::from_str("\"mongodb\"").unwrap();
        assert_eq!(backend, StoreBackend::MongoDb);
        assert_eq!(StoreBackend::default().as_str(), "memory");
    }

    #[tokio::test]
    async fn test_default_builds_memory_store() {
        let store = ReblogStoreBuilder::new().build().await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn test_mongo_without_feature_is_rejected() {
        let result = ReblogStoreBuilder::new()
            .backend(StoreBackend::MongoDb)
            .mongodb_uri("mongodb://localhost:27017")
            .database("reblog")
            .build()
            .await;
        assert!(matches!(result, Err(PersistError::Internal(_))));
    }
}
