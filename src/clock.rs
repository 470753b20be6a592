//! Wall-clock helpers shared by the cache, the rate limiter and responses.

use chrono::Utc;

/// Returns the current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns the current time as an RFC 3339 string (used in error envelopes).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
