pub mod entry;
pub mod star;

pub use entry::MongoEntryRepository;
pub use star::MongoStarRepository;
