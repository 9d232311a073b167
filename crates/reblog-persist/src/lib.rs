pub mod builder;
pub mod dbs;
pub mod error;
pub mod store;

pub use builder::{ReblogStoreBuilder, StoreBackend};
pub use dbs::memory::InMemoryReblogStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoReblogStore;
pub use error::{PersistError, Result};
pub use store::{normalize_description, validate_new_entry, ReblogStore};
