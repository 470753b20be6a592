//! Routing API client.
//!
//! One POST per directed query. The field mask limits the response to the
//! first route's duration and distance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::DEFAULT_ROUTES_API_URL;

use super::error::{classify_status, Service, UpstreamError};
use super::types::{parse_duration_secs, Location, RouteResult, TravelMode};
use super::RoutingApi;

const FIELD_MASK: &str = "routes.duration,routes.distanceMeters";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// API key sent as `X-Goog-Api-Key`
    pub api_key: String,
    /// Full `computeRoutes` endpoint
    pub url: String,
    /// Upper bound for a single call
    pub timeout: Duration,
}

impl RoutesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_ROUTES_API_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: &'a Location,
    destination: &'a Location,
    travel_mode: TravelMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_preference: Option<&'static str>,
    compute_alternative_routes: bool,
    route_modifiers: RouteModifiers,
    language_code: &'static str,
    units: &'static str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteModifiers {
    avoid_tolls: bool,
    avoid_highways: bool,
    avoid_ferries: bool,
}

impl<'a> ComputeRoutesRequest<'a> {
    fn new(origin: &'a Location, destination: &'a Location, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            travel_mode: mode,
            // traffic awareness only applies to driving
            routing_preference: (mode == TravelMode::Drive).then_some("TRAFFIC_AWARE"),
            compute_alternative_routes: false,
            route_modifiers: RouteModifiers::default(),
            language_code: "en-US",
            units: "IMPERIAL",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<RouteFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteFields {
    duration: Option<String>,
    distance_meters: Option<u64>,
}

/// Routing API client.
#[derive(Debug, Clone)]
pub struct RoutesClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
    timeout: Duration,
}

impl RoutesClient {
    pub fn new(config: RoutesConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            url: config.url,
            timeout: config.timeout,
        })
    }

    async fn send(
        &self,
        body: &ComputeRoutesRequest<'_>,
    ) -> Result<(StatusCode, String), UpstreamError> {
        let secs = self.timeout.as_secs();
        let response = self
            .http
            .post(&self.url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Service::Routing, secs, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(Service::Routing, secs, e))?;

        Ok((status, text))
    }
}

#[async_trait]
impl RoutingApi for RoutesClient {
    async fn fetch_route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> Result<RouteResult, UpstreamError> {
        let body = ComputeRoutesRequest::new(origin, destination, mode);

        // dropping the in-flight future aborts the request
        let (status, text) = tokio::time::timeout(self.timeout, self.send(&body))
            .await
            .map_err(|_| UpstreamError::Timeout {
                service: Service::Routing,
                secs: self.timeout.as_secs(),
            })??;

        debug!("Routing API response status: {}", status);

        if !status.is_success() {
            error!("Routing API error {}: {}", status, text);
            return Err(classify_status(Service::Routing, status));
        }

        let parsed: ComputeRoutesResponse = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::invalid(Service::Routing, e.to_string()))?;

        let route = parsed.routes.into_iter().next().ok_or_else(|| {
            UpstreamError::invalid(Service::Routing, "no routes found for the given addresses")
        })?;

        match (route.duration, route.distance_meters) {
            (Some(duration), Some(distance_meters))
                if distance_meters > 0 && parse_duration_secs(&duration).is_some() =>
            {
                Ok(RouteResult {
                    duration,
                    distance_meters,
                })
            }
            _ => Err(UpstreamError::invalid(
                Service::Routing,
                "incomplete route data",
            )),
        }
    }
}
