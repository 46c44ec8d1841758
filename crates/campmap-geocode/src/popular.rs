//! Default suggestions shown before the user has typed enough to search.

use crate::result::{FeatureCategory, LocationResult, ICON_ADMINISTRATIVE, ICON_NATURAL};

struct PopularPlace {
    name: &'static str,
    latitude: f64,
    longitude: f64,
    bbox: Option<[f64; 4]>,
    place_type: &'static str,
    category: FeatureCategory,
    icon: &'static str,
}

const POPULAR_PLACES: &[PopularPlace] = &[
    PopularPlace {
        name: "New York City, New York",
        latitude: 40.7128,
        longitude: -74.0060,
        bbox: Some([-74.2591, 40.4774, -73.7004, 40.9176]),
        place_type: "city",
        category: FeatureCategory::Administrative,
        icon: ICON_ADMINISTRATIVE,
    },
    PopularPlace {
        name: "Buffalo, New York",
        latitude: 42.8864,
        longitude: -78.8784,
        bbox: None,
        place_type: "city",
        category: FeatureCategory::Administrative,
        icon: ICON_ADMINISTRATIVE,
    },
    PopularPlace {
        name: "Rochester, New York",
        latitude: 43.1566,
        longitude: -77.6088,
        bbox: None,
        place_type: "city",
        category: FeatureCategory::Administrative,
        icon: ICON_ADMINISTRATIVE,
    },
    PopularPlace {
        name: "Syracuse, New York",
        latitude: 43.0481,
        longitude: -76.1474,
        bbox: None,
        place_type: "city",
        category: FeatureCategory::Administrative,
        icon: ICON_ADMINISTRATIVE,
    },
    PopularPlace {
        name: "Albany, New York",
        latitude: 42.6526,
        longitude: -73.7562,
        bbox: None,
        place_type: "city",
        category: FeatureCategory::Administrative,
        icon: ICON_ADMINISTRATIVE,
    },
    PopularPlace {
        name: "Adirondack Park, New York",
        latitude: 43.9654,
        longitude: -74.3118,
        bbox: Some([-75.3, 42.9, -73.3, 44.9]),
        place_type: "protected_area",
        category: FeatureCategory::Natural,
        icon: ICON_NATURAL,
    },
    PopularPlace {
        name: "Catskill Park, New York",
        latitude: 42.1157,
        longitude: -74.3621,
        bbox: Some([-74.8, 41.8, -73.9, 42.4]),
        place_type: "protected_area",
        category: FeatureCategory::Natural,
        icon: ICON_NATURAL,
    },
];

/// Hand-curated locations. No network access, caching, or filtering.
#[must_use]
pub fn popular_locations() -> Vec<LocationResult> {
    POPULAR_PLACES
        .iter()
        .map(|p| LocationResult {
            display_name: p.name.to_owned(),
            latitude: p.latitude,
            longitude: p.longitude,
            bbox: p.bbox,
            importance: 1.0,
            place_type: p.place_type.to_owned(),
            feature_category: p.category,
            icon: p.icon,
        })
        .collect()
}
