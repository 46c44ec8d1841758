//! Nominatim response types.
//!
//! Nominatim encodes coordinates, importance, and bounding boxes as numeric
//! strings, but some deployments emit bare numbers. [`Numeric`] accepts
//! either form.

use serde::Deserialize;

/// A JSON value that is either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Returns the parsed value, or `None` if the string form does not parse.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// Structured address block returned when `addressdetails=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub state: Option<String>,
}

/// A single place record from the `search` or `reverse` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub display_name: String,
    #[serde(default)]
    pub lat: Option<Numeric>,
    #[serde(default)]
    pub lon: Option<Numeric>,
    #[serde(rename = "type", default)]
    pub place_type: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub importance: Option<Numeric>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    /// Ordered `[south, north, west, east]`.
    #[serde(default)]
    pub boundingbox: Option<Vec<Numeric>>,
}

impl NominatimPlace {
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.address.as_ref().and_then(|a| a.state.as_deref())
    }
}
