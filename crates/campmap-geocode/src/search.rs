//! The location search service: cached, throttled, region-filtered lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use campmap_core::AppConfig;
use tokio::sync::Mutex;

use crate::cache::{normalize_query, CachePolicy, SearchCache};
use crate::client::GeocoderClient;
use crate::error::{GeocodingError, SetupError};
use crate::filter::{rank_places, Ranked};
use crate::region::Region;
use crate::result::{FeatureCategory, LocationResult, ICON_ADMINISTRATIVE};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "campmap/0.1 (ny-campsite-viewer)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Construction parameters for [`LocationSearch`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Deadline for each upstream request, connect included.
    pub timeout: Duration,
    /// Minimum spacing between upstream requests, shared by search and reverse.
    pub min_interval: Duration,
    pub cache: CachePolicy,
    pub region: Region,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
            cache: CachePolicy::default(),
            region: Region::new_york(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocoder_base_url.clone(),
            user_agent: config.geocoder_user_agent.clone(),
            timeout: Duration::from_secs(config.geocoder_timeout_secs),
            min_interval: Duration::from_millis(config.geocoder_min_interval_ms),
            cache: CachePolicy {
                max_entries: config.cache_max_entries,
                ttl: config.cache_ttl_secs.map(Duration::from_secs),
            },
            region: Region::new_york(),
        }
    }
}

/// Searches for places in the target region.
///
/// Owns its HTTP client, request throttle, and result cache; separate
/// instances share nothing. Concurrent searches for the same normalized query
/// are coalesced so only one reaches the geocoder.
pub struct LocationSearch {
    client: GeocoderClient,
    region: Region,
    cache: Mutex<SearchCache>,
    in_flight: StdMutex<HashMap<String, InFlightSlot>>,
}

/// Per-query lock shared by every caller currently searching that query.
#[derive(Default)]
struct InFlightSlot {
    lock: Arc<Mutex<()>>,
    waiters: usize,
}

/// A caller's claim on an [`InFlightSlot`]. Dropping it, including when the
/// search future is cancelled, releases the claim and removes the slot once
/// no callers remain.
struct InFlightClaim<'a> {
    in_flight: &'a StdMutex<HashMap<String, InFlightSlot>>,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlightClaim<'a> {
    fn join(in_flight: &'a StdMutex<HashMap<String, InFlightSlot>>, key: &str) -> Self {
        let mut slots = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key.to_owned()).or_default();
        slot.waiters += 1;
        let lock = Arc::clone(&slot.lock);
        Self {
            in_flight,
            key: key.to_owned(),
            lock,
        }
    }
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        let mut slots = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let last = match slots.get_mut(&self.key) {
            Some(slot) => {
                slot.waiters = slot.waiters.saturating_sub(1);
                slot.waiters == 0
            }
            None => false,
        };
        if last {
            slots.remove(&self.key);
        }
    }
}

impl LocationSearch {
    /// # Errors
    ///
    /// Returns [`SetupError`] if the HTTP client cannot be built or the base
    /// URL is invalid.
    pub fn new(config: SearchConfig) -> Result<Self, SetupError> {
        let client = GeocoderClient::new(
            &config.base_url,
            &config.user_agent,
            config.timeout,
            config.min_interval,
        )?;
        Ok(Self {
            client,
            region: config.region,
            cache: Mutex::new(SearchCache::new(config.cache)),
            in_flight: StdMutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Searches for `query`, returning in-region results ranked by importance.
    ///
    /// Blank queries return an empty list without touching the network or
    /// the cache. Cached queries (case- and whitespace-insensitive) return
    /// immediately. When no in-region result survives filtering, up to three
    /// out-of-region results are returned instead, tagged in their names.
    ///
    /// # Errors
    ///
    /// - [`GeocodingError::RateLimit`] if the geocoder answered HTTP 429.
    /// - [`GeocodingError::Api`] for any other non-2xx status.
    /// - [`GeocodingError::Network`] on transport failure, timeout, or an
    ///   unreadable body.
    pub async fn search_location(
        &self,
        query: &str,
    ) -> Result<Vec<LocationResult>, GeocodingError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let key = normalize_query(trimmed);
        let cached = self.cache.lock().await.get(&key);
        if let Some(hit) = cached {
            tracing::debug!(query = %key, "search cache hit");
            return Ok(hit);
        }

        let claim = InFlightClaim::join(&self.in_flight, &key);
        let _guard = claim.lock.lock().await;
        // Another caller may have filled the cache while we waited.
        let cached = self.cache.lock().await.get(&key);
        match cached {
            Some(hit) => {
                tracing::debug!(query = %key, "search cache filled by concurrent caller");
                Ok(hit)
            }
            None => self.fetch_and_cache(trimmed, &key).await,
        }
    }

    /// Looks up the place at a coordinate.
    ///
    /// Returns `None` on any failure, HTTP or network; reverse lookups are
    /// never cached and never filtered by region.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<LocationResult> {
        match self.client.reverse(lat, lon).await {
            Ok(place) => Some(LocationResult::from_place(
                &place,
                FeatureCategory::Administrative,
                ICON_ADMINISTRATIVE,
            )),
            Err(e) => {
                tracing::warn!(lat, lon, code = %e.code(), error = %e, "reverse geocode failed");
                None
            }
        }
    }

    /// Drops every cached search.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Number of cached searches.
    pub async fn cached_searches(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch_and_cache(
        &self,
        query: &str,
        key: &str,
    ) -> Result<Vec<LocationResult>, GeocodingError> {
        let places = self
            .client
            .search(query, &self.region)
            .await
            .inspect_err(|e| {
                tracing::warn!(query = %key, code = %e.code(), error = %e, "location search failed");
            })?;

        let results = match rank_places(&places, &self.region) {
            Ranked::InRegion(results) => results,
            Ranked::Fallback(results) => {
                tracing::info!(
                    query = %key,
                    upstream = places.len(),
                    fallback = results.len(),
                    "no in-region matches; returning out-of-region fallback"
                );
                results
            }
        };

        self.cache
            .lock()
            .await
            .insert(key.to_owned(), results.clone());
        Ok(results)
    }
}
