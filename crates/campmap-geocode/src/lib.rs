//! Place search for the campsite map.
//!
//! [`LocationSearch`] queries a Nominatim geocoder, keeps only results inside
//! the target [`Region`] that are places or natural/recreational features,
//! ranks them by importance, and falls back to a short out-of-region list when
//! the region test rejects everything. Requests are throttled and successful
//! searches are cached.

mod cache;
mod client;
pub mod error;
pub mod filter;
mod popular;
pub mod region;
pub mod result;
mod search;
mod throttle;
pub mod types;

pub use cache::{normalize_query, CachePolicy};
pub use client::{REVERSE_ZOOM, SEARCH_LIMIT};
pub use error::{GeocodingError, GeocodingErrorCode, SetupError};
pub use filter::{rank_places, Ranked, FALLBACK_LIMIT};
pub use popular::popular_locations;
pub use region::Region;
pub use result::{FeatureCategory, LocationResult};
pub use search::{LocationSearch, SearchConfig};
