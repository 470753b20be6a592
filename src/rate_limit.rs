//! Sliding-window rate limiting keyed by client identity.
//!
//! Each client's recent request timestamps are kept in the store under
//! `ratelimit:<client>`. Concurrent requests from one client may both read an
//! under-limit window and both write; that race is accepted.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::now_ms;
use crate::store::{KvStore, StoreError};

/// Headers consulted, in order, for the client identity.
const CLIENT_ID_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-forwarded-for", "x-real-ip"];

/// Identity used when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the client identity from proxy headers.
///
/// For `X-Forwarded-For` only the first (client-most) hop is used.
pub fn client_identity(headers: &HeaderMap) -> String {
    CLIENT_ID_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

pub fn rate_limit_key(client_id: &str) -> String {
    format!("ratelimit:{client_id}")
}

/// Capacity of one client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_millis(60_000),
        }
    }
}

/// Persisted form of a client's window.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RateWindow {
    #[serde(default)]
    requests: Vec<i64>,
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns whether the request is allowed, recording it if so.
    ///
    /// Rejected requests are not recorded. Storage failures fail open.
    pub async fn check_and_record(&self, client_id: &str) -> bool {
        match self.try_check_and_record(client_id).await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!("Rate limiting error for {}, allowing request: {}", client_id, e);
                true
            }
        }
    }

    async fn try_check_and_record(&self, client_id: &str) -> Result<bool, StoreError> {
        let key = rate_limit_key(client_id);
        let now = now_ms();
        let window_ms = i64::try_from(self.policy.window.as_millis()).unwrap_or(i64::MAX);
        let window_start = now.saturating_sub(window_ms);

        let mut window = match self.store.get(&key).await? {
            Some(raw) => serde_json::from_str::<RateWindow>(&raw)?,
            None => RateWindow::default(),
        };
        window.requests.retain(|&t| t > window_start);

        if window.requests.len() >= self.policy.max_requests {
            return Ok(false);
        }

        window.requests.push(now);
        let raw = serde_json::to_string(&window)?;
        self.store.put(&key, raw, self.expiry()).await?;
        Ok(true)
    }

    /// Store expiration for a window: its length rounded up to whole seconds.
    fn expiry(&self) -> Duration {
        let millis = u64::try_from(self.policy.window.as_millis()).unwrap_or(u64::MAX);
        Duration::from_secs(millis.div_ceil(1000))
    }
}
