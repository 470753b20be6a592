//! Transit predictions API client.
//!
//! Queries upcoming arrivals for one stop on one route, sorted by arrival
//! time and capped at [`PREDICTION_LIMIT`] results.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::DEFAULT_PREDICTIONS_API_URL;

use super::error::{classify_status, Service, UpstreamError};
use super::types::{Direction, TransitPrediction, PREDICTION_LIMIT};
use super::TransitApi;

/// Configuration for the predictions client.
#[derive(Debug, Clone)]
pub struct PredictionsConfig {
    /// Optional key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Base URL; `/predictions` is appended
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for PredictionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PREDICTIONS_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl PredictionsConfig {
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One element of the JSON:API `data` array.
#[derive(Debug, Deserialize)]
struct PredictionResource {
    attributes: PredictionAttributes,
}

#[derive(Debug, Deserialize)]
struct PredictionAttributes {
    arrival_time: Option<DateTime<FixedOffset>>,
    departure_time: Option<DateTime<FixedOffset>>,
    direction_id: i64,
    status: Option<String>,
}

impl From<PredictionAttributes> for TransitPrediction {
    fn from(attrs: PredictionAttributes) -> Self {
        Self {
            arrival_time: attrs.arrival_time,
            departure_time: attrs.departure_time,
            direction: Direction::from_id(attrs.direction_id),
            status: attrs.status,
        }
    }
}

/// Transit predictions API client.
#[derive(Debug, Clone)]
pub struct PredictionsClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl PredictionsClient {
    pub fn new(config: PredictionsConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.api+json"));
        if let Some(key) = config.api_key.as_deref() {
            // an unusable key is skipped; the API works unauthenticated at a lower quota
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert("x-api-key", value);
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            url: format!("{}/predictions", config.base_url.trim_end_matches('/')),
            timeout: config.timeout,
        })
    }

    async fn send(
        &self,
        station_id: &str,
        route_id: &str,
    ) -> Result<(StatusCode, String), UpstreamError> {
        let secs = self.timeout.as_secs();
        let limit = PREDICTION_LIMIT.to_string();
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("filter[stop]", station_id),
                ("filter[route]", route_id),
                ("sort", "arrival_time"),
                ("page[limit]", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Service::Transit, secs, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(Service::Transit, secs, e))?;

        Ok((status, text))
    }
}

#[async_trait]
impl TransitApi for PredictionsClient {
    async fn fetch_predictions(
        &self,
        station_id: &str,
        route_id: &str,
    ) -> Result<Vec<TransitPrediction>, UpstreamError> {
        let (status, text) = tokio::time::timeout(self.timeout, self.send(station_id, route_id))
            .await
            .map_err(|_| UpstreamError::Timeout {
                service: Service::Transit,
                secs: self.timeout.as_secs(),
            })??;

        debug!("Predictions API response status: {}", status);

        if !status.is_success() {
            error!("Predictions API error {}: {}", status, text);
            return Err(classify_status(Service::Transit, status));
        }

        parse_predictions(&text)
    }
}

/// Decodes a predictions document, keeping arrival order and the result cap.
fn parse_predictions(text: &str) -> Result<Vec<TransitPrediction>, UpstreamError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| UpstreamError::invalid(Service::Transit, e.to_string()))?;

    let Some(items) = document.get("data").and_then(Value::as_array) else {
        return Err(UpstreamError::invalid(
            Service::Transit,
            "data field is not a list",
        ));
    };

    let mut predictions = items
        .iter()
        .map(|item| {
            PredictionResource::deserialize(item)
                .map(|resource| TransitPrediction::from(resource.attributes))
                .map_err(|e| UpstreamError::invalid(Service::Transit, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // server sorts already; a stable sort keeps its order and puts unknown arrivals last
    predictions.sort_by_key(|p| (p.arrival_time.is_none(), p.arrival_time));
    predictions.truncate(PREDICTION_LIMIT);

    Ok(predictions)
}
