//! Memory Store Module
//!
//! In-process backend: a HashMap of entries with absolute expiration times.
//! When full, the entry closest to expiring is evicted first.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use super::{StoreError, StoredEntry, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Memory Store ==
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, StoredEntry>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a value that expires after `ttl`.
    ///
    /// Overwriting an existing key replaces its value and resets its expiry.
    /// At capacity, expired entries are purged first, then the entry with
    /// the earliest expiration is evicted.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> Result<(), StoreError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::KeyTooLong);
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::ValueTooLarge);
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_soonest_expiring()?;
            }
        }

        self.entries.insert(key, StoredEntry::new(value, ttl));
        Ok(())
    }

    // == Get ==
    /// Returns the value if present and not expired. Expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    fn evict_soonest_expiring(&mut self) -> Result<(), StoreError> {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())
            .ok_or(StoreError::Full)?;

        debug!("Store at capacity, evicting {}", victim);
        self.entries.remove(&victim);
        Ok(())
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
