//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default endpoint of the routing provider.
pub const DEFAULT_ROUTES_API_URL: &str =
    "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Default base URL of the transit predictions provider.
pub const DEFAULT_PREDICTIONS_API_URL: &str = "https://api-v3.mbta.com";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Missing API credentials do not prevent startup; requests fail with a
/// configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// Routing provider API key
    pub google_api_key: Option<String>,
    /// Optional transit provider API key
    pub mbta_api_key: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Origin used when a request does not supply one
    pub default_origin: String,
    /// Destination used when a request does not supply one
    pub default_destination: String,
    /// Station used when a request does not supply one
    pub default_station: String,
    /// Transit route queried for predictions
    pub transit_route: String,
    /// Age under which a cached drive-time entry is served as fresh
    pub cache_freshness: Duration,
    /// Hard expiration handed to the store for drive-time entries
    pub cache_ttl: Duration,
    /// Requests allowed per client inside one window
    pub rate_limit_max_requests: usize,
    /// Length of the sliding rate-limit window
    pub rate_limit_window: Duration,
    /// Timeout for a single routing call
    pub routing_timeout: Duration,
    /// Timeout for a single predictions call
    pub predictions_timeout: Duration,
    /// Routing provider endpoint
    pub routes_api_url: String,
    /// Transit provider base URL
    pub predictions_api_url: String,
    /// Maximum number of entries the in-process store can hold
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GOOGLE_API_KEY` - Routing API key (default: unset)
    /// - `MBTA_API_KEY` - Transit API key (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 8787)
    /// - `DEFAULT_ORIGIN`, `DEFAULT_DESTINATION` - Fallback addresses
    /// - `DEFAULT_STATION` - Fallback station id (default: place-harsq)
    /// - `TRANSIT_ROUTE` - Route id for predictions (default: Red)
    /// - `CACHE_FRESHNESS_SECS` - Freshness window (default: 240)
    /// - `CACHE_TTL_SECS` - Store expiration for cached routes (default: 300)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Requests per window (default: 60)
    /// - `RATE_LIMIT_WINDOW_MS` - Window length (default: 60000)
    /// - `ROUTING_TIMEOUT_SECS` / `PREDICTIONS_TIMEOUT_SECS` - Upstream timeouts (15 / 10)
    /// - `ROUTES_API_URL` / `PREDICTIONS_API_URL` - Upstream endpoints
    /// - `MAX_ENTRIES` - Maximum store entries (default: 1000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            mbta_api_key: non_empty_var("MBTA_API_KEY"),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_origin: non_empty_var("DEFAULT_ORIGIN").unwrap_or(defaults.default_origin),
            default_destination: non_empty_var("DEFAULT_DESTINATION")
                .unwrap_or(defaults.default_destination),
            default_station: non_empty_var("DEFAULT_STATION").unwrap_or(defaults.default_station),
            transit_route: non_empty_var("TRANSIT_ROUTE").unwrap_or(defaults.transit_route),
            cache_freshness: parsed_var("CACHE_FRESHNESS_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_freshness),
            cache_ttl: parsed_var("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            rate_limit_max_requests: parsed_var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or(defaults.rate_limit_max_requests),
            rate_limit_window: parsed_var("RATE_LIMIT_WINDOW_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.rate_limit_window),
            routing_timeout: parsed_var("ROUTING_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.routing_timeout),
            predictions_timeout: parsed_var("PREDICTIONS_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.predictions_timeout),
            routes_api_url: non_empty_var("ROUTES_API_URL").unwrap_or(defaults.routes_api_url),
            predictions_api_url: non_empty_var("PREDICTIONS_API_URL")
                .unwrap_or(defaults.predictions_api_url),
            max_entries: parsed_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            mbta_api_key: None,
            server_port: 8787,
            default_origin: "1 Beacon St, Boston, MA 02108".to_string(),
            default_destination: "77 Massachusetts Ave, Cambridge, MA 02139".to_string(),
            default_station: "place-harsq".to_string(),
            transit_route: "Red".to_string(),
            cache_freshness: Duration::from_secs(4 * 60),
            cache_ttl: Duration::from_secs(5 * 60),
            rate_limit_max_requests: 60,
            rate_limit_window: Duration::from_millis(60_000),
            routing_timeout: Duration::from_secs(15),
            predictions_timeout: Duration::from_secs(10),
            routes_api_url: DEFAULT_ROUTES_API_URL.to_string(),
            predictions_api_url: DEFAULT_PREDICTIONS_API_URL.to_string(),
            max_entries: 1000,
            cleanup_interval: 1,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.google_api_key.is_none());
        assert_eq!(config.server_port, 8787);
        assert_eq!(config.default_station, "place-harsq");
        assert_eq!(config.transit_route, "Red");
        assert_eq!(config.cache_freshness, Duration::from_secs(240));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.rate_limit_max_requests, 60);
        assert_eq!(config.rate_limit_window, Duration::from_millis(60_000));
        assert_eq!(config.routing_timeout, Duration::from_secs(15));
        assert_eq!(config.predictions_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_freshness_shorter_than_store_ttl() {
        let config = Config::default();
        assert!(config.cache_freshness < config.cache_ttl);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("RATE_LIMIT_MAX_REQUESTS");
        env::remove_var("TRANSIT_ROUTE");

        let config = Config::from_env();
        assert_eq!(config.server_port, 8787);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.rate_limit_max_requests, 60);
        assert_eq!(config.transit_route, "Red");
    }
}
