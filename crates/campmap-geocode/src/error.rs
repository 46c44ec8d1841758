use serde::Serialize;
use thiserror::Error;

/// Stable machine-readable tag for a [`GeocodingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodingErrorCode {
    NetworkError,
    NoResults,
    ApiError,
    RateLimit,
}

impl GeocodingErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::NoResults => "NO_RESULTS",
            Self::ApiError => "API_ERROR",
            Self::RateLimit => "RATE_LIMIT",
        }
    }
}

impl std::fmt::Display for GeocodingErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed location search.
///
/// The `Display` output is the user-facing message; [`GeocodingError::code`]
/// gives the tag callers branch on.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Transport failure, timeout, or an unreadable response body.
    #[error("Unable to reach the location service: {0}")]
    Network(String),

    /// Reserved. Searches that match nothing return an empty list instead.
    #[error("No locations found for that search.")]
    NoResults,

    /// The geocoder answered with a non-success status other than 429.
    #[error("The location service returned an error (HTTP {status}). Please try again later.")]
    Api { status: u16 },

    /// The geocoder answered with HTTP 429.
    #[error("Too many requests. Please wait a moment before searching again.")]
    RateLimit,
}

impl GeocodingError {
    #[must_use]
    pub fn code(&self) -> GeocodingErrorCode {
        match self {
            Self::Network(_) => GeocodingErrorCode::NetworkError,
            Self::NoResults => GeocodingErrorCode::NoResults,
            Self::Api { .. } => GeocodingErrorCode::ApiError,
            Self::RateLimit => GeocodingErrorCode::RateLimit,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Errors raised while constructing a [`crate::LocationSearch`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid geocoder base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
