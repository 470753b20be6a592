//! Response cache for drive-time results.
//!
//! Entries are written with a hard store expiration (`ttl`) but are only
//! served while younger than a shorter freshness window. Between the two an
//! entry still exists in the store yet is treated as cold and refetched.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::KvStore;
use crate::upstream::Location;

const DRIVE_TIME_KEY_PREFIX: &str = "drive-times";

/// Cache key for one origin→destination request shape.
///
/// Built from the canonical JSON form of both locations, so swapping them
/// yields a different key.
pub fn drive_time_cache_key(origin: &Location, destination: &Location) -> String {
    format!(
        "{DRIVE_TIME_KEY_PREFIX}-{}-{}",
        canonical(origin),
        canonical(destination)
    )
}

fn canonical(location: &Location) -> String {
    serde_json::to_string(location).unwrap_or_default()
}

/// A cached payload stamped with its write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    /// Write time, Unix milliseconds
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, timestamp: i64) -> Self {
        Self { payload, timestamp }
    }

    /// Age at `now`, never negative.
    pub fn age_ms(&self, now: i64) -> i64 {
        (now - self.timestamp).max(0)
    }

    pub fn is_fresh(&self, now: i64, window: Duration) -> bool {
        self.age_ms(now) < duration_ms(window)
    }

    /// Whole seconds left before the freshness window closes, rounded up.
    pub fn fresh_secs_remaining(&self, now: i64, window: Duration) -> u64 {
        let remaining_ms = (duration_ms(window) - self.age_ms(now)).max(0);
        u64::try_from(remaining_ms).unwrap_or(0).div_ceil(1000)
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Typed get/put over the storage capability.
///
/// Storage or decoding failures degrade to a miss (on read) or to an
/// uncached response (on write); they never fail the request.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KvStore>,
    freshness: Duration,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KvStore>, freshness: Duration, ttl: Duration) -> Self {
        Self {
            store,
            freshness,
            ttl,
        }
    }

    /// Freshness window callers check entries against.
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Discarding malformed cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Stores `entry` with the hard expiration.
    pub async fn put<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) {
        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not encode cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.put(key, raw, self.ttl).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}
