pub mod repository;
pub mod sqlite;

pub use repository::{CacheStorage, InMemoryRepository, KeyValueStore, Storage, StorageError};
