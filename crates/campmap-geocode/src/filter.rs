//! Relevance filtering and ranking of raw geocoder records.
//!
//! A record is kept when it is both inside the target [`Region`] and of a
//! relevant type or class. Kept records are ranked by upstream importance.
//! When nothing survives but the geocoder did return something, a small
//! region-agnostic fallback list is produced instead.

use crate::region::Region;
use crate::result::{
    FeatureCategory, LocationResult, ICON_ADMINISTRATIVE, ICON_NATURAL, ICON_PEAK,
    ICON_RECREATION, ICON_WATER,
};
use crate::types::NominatimPlace;

/// Upstream `type` values worth showing.
const RELEVANT_TYPES: &[&str] = &[
    // Administrative places
    "city",
    "town",
    "village",
    "hamlet",
    "county",
    "state",
    "municipality",
    "borough",
    "administrative",
    "locality",
    // Natural and recreational features
    "lake",
    "peak",
    "forest",
    "wood",
    "nature_reserve",
    "protected_area",
    "park",
    "island",
    "mountain",
    "water",
];

/// Upstream `class` values worth showing regardless of `type`.
const RELEVANT_CLASSES: &[&str] = &[
    "place",
    "administrative",
    "boundary",
    "natural",
    "water",
    "leisure",
];

/// Maximum number of entries in a fallback list.
pub const FALLBACK_LIMIT: usize = 3;

/// What the pipeline decided for one upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranked {
    /// Records that passed both the region and the type/class tests.
    InRegion(Vec<LocationResult>),
    /// Nothing passed the region test; these passed only the type/class test.
    Fallback(Vec<LocationResult>),
}

impl Ranked {
    #[must_use]
    pub fn into_results(self) -> Vec<LocationResult> {
        match self {
            Self::InRegion(results) | Self::Fallback(results) => results,
        }
    }
}

/// Returns `true` if the record's label or structured state places it in `region`.
#[must_use]
pub fn is_in_region(place: &NominatimPlace, region: &Region) -> bool {
    let label = place.display_name.to_lowercase();
    if region
        .label_markers()
        .iter()
        .any(|marker| label.contains(marker.as_str()))
    {
        return true;
    }
    place
        .state()
        .is_some_and(|state| state == region.name || state == region.code)
}

/// Returns `true` if the record's `type` or `class` is one we display.
#[must_use]
pub fn is_relevant_type(place: &NominatimPlace) -> bool {
    RELEVANT_TYPES.contains(&place.place_type.as_str())
        || RELEVANT_CLASSES.contains(&place.class.as_str())
}

/// Assigns a feature category and icon. First matching rule wins.
#[must_use]
pub fn categorize(place: &NominatimPlace) -> (FeatureCategory, &'static str) {
    match (place.class.as_str(), place.place_type.as_str()) {
        ("natural", "peak") => (FeatureCategory::Natural, ICON_PEAK),
        ("natural", _) => (FeatureCategory::Natural, ICON_NATURAL),
        ("water", _) => (FeatureCategory::Water, ICON_WATER),
        ("leisure", _) => (FeatureCategory::Recreation, ICON_RECREATION),
        (_, "protected_area" | "nature_reserve") => (FeatureCategory::Natural, ICON_NATURAL),
        (_, "park") => (FeatureCategory::Recreation, ICON_RECREATION),
        _ => (FeatureCategory::Administrative, ICON_ADMINISTRATIVE),
    }
}

/// Runs the full relevance pipeline over one upstream response.
#[must_use]
pub fn rank_places(places: &[NominatimPlace], region: &Region) -> Ranked {
    let mut kept: Vec<LocationResult> = places
        .iter()
        .filter(|p| is_in_region(p, region) && is_relevant_type(p))
        .map(|p| {
            let (category, icon) = categorize(p);
            LocationResult::from_place(p, category, icon)
        })
        .collect();

    if kept.is_empty() && !places.is_empty() {
        return Ranked::Fallback(fallback_results(places, region));
    }

    // `sort_by` is stable, so equal importance keeps upstream order.
    kept.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Ranked::InRegion(kept)
}

/// Region-agnostic results, tagged as outside the region, in upstream order.
#[must_use]
pub fn fallback_results(places: &[NominatimPlace], region: &Region) -> Vec<LocationResult> {
    places
        .iter()
        .filter(|p| is_relevant_type(p))
        .take(FALLBACK_LIMIT)
        .map(|p| {
            let mut result =
                LocationResult::from_place(p, FeatureCategory::Administrative, ICON_ADMINISTRATIVE);
            result.display_name = format!("{} (outside {})", result.display_name, region.name);
            result
        })
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
