use assess_core::cache::{CacheName, CachedResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value snapshots, the local storage of the site.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Named buckets of request → response pairs.
///
/// Bucket names are kept in creation order; `match_any` searches in that order.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open `name`, creating an empty bucket if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bucket cannot be created.
    async fn open(&self, name: &CacheName) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the bucket list cannot be read.
    async fn bucket_names(&self) -> Result<Vec<String>, StorageError>;

    /// Delete a bucket and all its entries. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_bucket(&self, name: &str) -> Result<bool, StorageError>;

    /// Store `response` under `key`, replacing any earlier entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bucket was never opened.
    async fn put(
        &self,
        bucket: &CacheName,
        key: &str,
        response: &CachedResponse,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn lookup(
        &self,
        bucket: &CacheName,
        key: &str,
    ) -> Result<Option<CachedResponse>, StorageError>;

    /// First entry for `key` across all buckets.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn match_any(&self, key: &str) -> Result<Option<CachedResponse>, StorageError>;

    /// Keys stored in `bucket`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bucket does not exist.
    async fn keys(&self, bucket: &CacheName) -> Result<Vec<String>, StorageError>;
}

type Bucket = HashMap<String, CachedResponse>;

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    items: Arc<Mutex<HashMap<String, String>>>,
    buckets: Arc<Mutex<Vec<(String, Bucket)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: ToString>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.items.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.items.lock().map_err(poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.items.lock().map_err(poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for InMemoryRepository {
    async fn open(&self, name: &CacheName) -> Result<(), StorageError> {
        let mut guard = self.buckets.lock().map_err(poisoned)?;
        if !guard.iter().any(|(existing, _)| existing == name.as_str()) {
            guard.push((name.as_str().to_owned(), Bucket::new()));
        }
        Ok(())
    }

    async fn bucket_names(&self) -> Result<Vec<String>, StorageError> {
        let guard = self.buckets.lock().map_err(poisoned)?;
        Ok(guard.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete_bucket(&self, name: &str) -> Result<bool, StorageError> {
        let mut guard = self.buckets.lock().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|(existing, _)| existing != name);
        Ok(guard.len() != before)
    }

    async fn put(
        &self,
        bucket: &CacheName,
        key: &str,
        response: &CachedResponse,
    ) -> Result<(), StorageError> {
        let mut guard = self.buckets.lock().map_err(poisoned)?;
        let (_, entries) = guard
            .iter_mut()
            .find(|(name, _)| name == bucket.as_str())
            .ok_or(StorageError::NotFound)?;
        entries.insert(key.to_owned(), response.clone());
        Ok(())
    }

    async fn lookup(
        &self,
        bucket: &CacheName,
        key: &str,
    ) -> Result<Option<CachedResponse>, StorageError> {
        let guard = self.buckets.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|(name, _)| name == bucket.as_str())
            .and_then(|(_, entries)| entries.get(key).cloned()))
    }

    async fn match_any(&self, key: &str) -> Result<Option<CachedResponse>, StorageError> {
        let guard = self.buckets.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find_map(|(_, entries)| entries.get(key).cloned()))
    }

    async fn keys(&self, bucket: &CacheName) -> Result<Vec<String>, StorageError> {
        let guard = self.buckets.lock().map_err(poisoned)?;
        let (_, entries) = guard
            .iter()
            .find(|(name, _)| name == bucket.as_str())
            .ok_or(StorageError::NotFound)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Aggregates the key-value store and cache buckets behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub local: Arc<dyn KeyValueStore>,
    pub caches: Arc<dyn CacheStorage>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let local: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
        let caches: Arc<dyn CacheStorage> = Arc::new(repo);
        Self { local, caches }
    }
}
