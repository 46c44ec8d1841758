//! Normalized location results handed to the map and search UI.

use serde::Serialize;

use crate::types::{Numeric, NominatimPlace};

pub const ICON_ADMINISTRATIVE: &str = "📍";
pub const ICON_PEAK: &str = "⛰️";
pub const ICON_NATURAL: &str = "🌲";
pub const ICON_WATER: &str = "💧";
pub const ICON_RECREATION: &str = "🏞️";

/// Presentation grouping for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Administrative,
    Natural,
    Water,
    Recreation,
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Administrative => "administrative",
            Self::Natural => "natural",
            Self::Water => "water",
            Self::Recreation => "recreation",
        };
        f.write_str(label)
    }
}

/// A candidate location.
///
/// `latitude`/`longitude` are `NaN` when upstream sent something unparsable,
/// so callers can tell a bad coordinate from a real `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResult {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `[west, south, east, north]`.
    pub bbox: Option<[f64; 4]>,
    pub importance: f64,
    #[serde(rename = "type")]
    pub place_type: String,
    pub feature_category: FeatureCategory,
    pub icon: &'static str,
}

impl LocationResult {
    /// Builds a result from an upstream record with the given category and icon.
    #[must_use]
    pub fn from_place(place: &NominatimPlace, category: FeatureCategory, icon: &'static str) -> Self {
        Self {
            display_name: place.display_name.clone(),
            latitude: parse_coordinate(place.lat.as_ref()),
            longitude: parse_coordinate(place.lon.as_ref()),
            bbox: place.boundingbox.as_deref().and_then(reorder_bbox),
            importance: place
                .importance
                .as_ref()
                .and_then(Numeric::as_f64)
                .unwrap_or(0.0),
            place_type: place.place_type.clone(),
            feature_category: category,
            icon,
        }
    }
}

fn parse_coordinate(value: Option<&Numeric>) -> f64 {
    value.and_then(Numeric::as_f64).unwrap_or(f64::NAN)
}

/// Reorders Nominatim's `[south, north, west, east]` into `[west, south, east, north]`.
fn reorder_bbox(raw: &[Numeric]) -> Option<[f64; 4]> {
    let [south, north, west, east] = raw else {
        return None;
    };
    Some([
        parse_coordinate(Some(west)),
        parse_coordinate(Some(south)),
        parse_coordinate(Some(east)),
        parse_coordinate(Some(north)),
    ])
}
