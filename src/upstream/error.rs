//! Upstream client error types.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Which provider a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Routing,
    Transit,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Routing => write!(f, "routing API"),
            Service::Transit => write!(f, "transit predictions API"),
        }
    }
}

/// Errors from the upstream HTTP clients.
///
/// Messages never include upstream response bodies; those are logged instead.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The call did not finish within its timeout and was aborted
    #[error("{service} timed out after {secs}s")]
    Timeout { service: Service, secs: u64 },

    /// Provider answered 429
    #[error("{0} rate limit exceeded")]
    RateLimited(Service),

    /// Provider answered 5xx
    #[error("{service} temporarily unavailable ({status})")]
    Unavailable { service: Service, status: u16 },

    /// Provider answered 400
    #[error("{0} rejected the request parameters")]
    BadRequest(Service),

    /// Provider answered 401/403
    #[error("{0} key invalid or quota exceeded")]
    Auth(Service),

    /// Any other non-success status
    #[error("{service} returned unexpected status {status}")]
    Status { service: Service, status: u16 },

    /// Success status but the payload was unusable
    #[error("invalid response from {service}: {reason}")]
    InvalidResponse { service: Service, reason: String },

    /// Connection or protocol failure
    #[error("{service} request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn invalid(service: Service, reason: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse {
            service,
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(service: Service, secs: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout { service, secs }
        } else {
            UpstreamError::Transport { service, source }
        }
    }
}

/// Maps a non-success status code to its error category.
pub fn classify_status(service: Service, status: StatusCode) -> UpstreamError {
    match status.as_u16() {
        400 => UpstreamError::BadRequest(service),
        401 | 403 => UpstreamError::Auth(service),
        429 => UpstreamError::RateLimited(service),
        code @ 500..=599 => UpstreamError::Unavailable {
            service,
            status: code,
        },
        code => UpstreamError::Status {
            service,
            status: code,
        },
    }
}
