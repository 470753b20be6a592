//! Store Module
//!
//! Key-value storage with per-entry expiration. Handlers only see the
//! [`KvStore`] trait; the in-process [`MemoryStore`] is the default backend.

mod entry;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

pub use entry::StoredEntry;
pub use memory::MemoryStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Store Error ==
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("key exceeds maximum length of {} bytes", MAX_KEY_LENGTH)]
    KeyTooLong,

    #[error("value exceeds maximum size of {} bytes", MAX_VALUE_SIZE)]
    ValueTooLarge,

    #[error("store is full and eviction failed")]
    Full,

    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

// == Storage Capability ==
/// Opaque get/put-with-expiry storage.
///
/// Implementations must make each single-key operation atomic; nothing
/// here requires cross-key transactions.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;
}

// == Shared Store ==
/// Thread-safe handle to a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<MemoryStore>>,
}

impl SharedStore {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// The underlying lock, used by the cleanup task.
    pub fn handle(&self) -> Arc<RwLock<MemoryStore>> {
        self.inner.clone()
    }
}

#[async_trait]
impl KvStore for SharedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        // write lock: expired entries are dropped on read
        let mut store = self.inner.write().await;
        Ok(store.get(key))
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let mut store = self.inner.write().await;
        store.set(key.to_string(), value, ttl)
    }
}
