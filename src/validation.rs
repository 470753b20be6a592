//! Input validation for user-supplied addresses and station identifiers.
//!
//! Addresses are sanitized (markup characters stripped, whitespace trimmed)
//! and then checked for injection patterns and a plausible street-address shape.

use std::fmt;

use thiserror::Error;

use crate::stations::{self, Station};

/// Accepted address length, in characters, before sanitization.
pub const MIN_ADDRESS_LEN: usize = 5;
pub const MAX_ADDRESS_LEN: usize = 200;

/// Characters removed from every address.
const STRIPPED_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Case-insensitive substrings that mark input as hostile.
const SUSPICIOUS_PATTERNS: [&str; 9] = [
    "<script",
    "javascript:",
    "data:",
    "vbscript:",
    "onload",
    "onerror",
    "onclick",
    "alert(",
    "eval(",
];

/// Template-injection markers, matched verbatim.
const TEMPLATE_MARKERS: [&str; 3] = ["{{", "${", "[["];

/// Case-insensitive substrings accepted as a city/state marker when no comma is present.
const LOCALITY_TOKENS: [&str; 4] = ["ma", "massachusetts", "boston", "cambridge"];

// == Validation Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Address must be a non-empty string")]
    Empty,

    #[error("Address must be between 5 and 200 characters")]
    Length(usize),

    #[error("Address contains invalid characters")]
    Suspicious,

    #[error("Address must include street number, street name, and city/state")]
    Format,

    #[error("Invalid MBTA station ID")]
    UnknownStation,

    #[error("Malformed query string")]
    Query,
}

// == Sanitized Address ==
/// An address that passed validation; safe to forward upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedAddress(String);

impl SanitizedAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitizes and validates a free-text address.
///
/// Length is measured on the raw input. Injection patterns are checked on both
/// the raw and the sanitized text, so stripping `<` cannot hide a `<script` tag.
pub fn validate_address(input: &str) -> Result<SanitizedAddress, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = input.chars().count();
    if !(MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&len) {
        return Err(ValidationError::Length(len));
    }

    let sanitized: String = input
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    if is_suspicious(input) || is_suspicious(&sanitized) {
        return Err(ValidationError::Suspicious);
    }

    let has_digit = sanitized.chars().any(|c| c.is_ascii_digit());
    let has_letter = sanitized.chars().any(|c| c.is_ascii_alphabetic());
    if !has_digit || !has_letter || !has_locality(&sanitized) {
        return Err(ValidationError::Format);
    }

    Ok(SanitizedAddress(sanitized))
}

/// Accepts only identifiers from the fixed station table.
pub fn validate_station_id(input: &str) -> Result<&'static Station, ValidationError> {
    stations::find(input).ok_or(ValidationError::UnknownStation)
}

fn is_suspicious(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SUSPICIOUS_PATTERNS.iter().any(|p| lowered.contains(p))
        || TEMPLATE_MARKERS.iter().any(|m| text.contains(m))
}

fn has_locality(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains(',') || LOCALITY_TOKENS.iter().any(|t| lowered.contains(t))
}
