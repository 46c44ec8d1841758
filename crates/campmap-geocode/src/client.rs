//! HTTP client for the Nominatim `search` and `reverse` endpoints.
//!
//! Every request passes through the shared [`RequestThrottle`] before it is
//! sent. Status handling maps 429 to [`GeocodingError::RateLimit`], any other
//! non-2xx to [`GeocodingError::Api`], and transport or decoding failures to
//! [`GeocodingError::Network`].

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{GeocodingError, SetupError};
use crate::region::Region;
use crate::throttle::RequestThrottle;
use crate::types::NominatimPlace;

/// Results requested per forward search.
pub const SEARCH_LIMIT: u32 = 5;
/// Nominatim zoom level for reverse lookups (city/town granularity).
pub const REVERSE_ZOOM: u8 = 10;
const ACCEPT_LANGUAGE: &str = "en";

pub(crate) struct GeocoderClient {
    client: Client,
    search_endpoint: Url,
    reverse_endpoint: Url,
    throttle: RequestThrottle,
}

impl GeocoderClient {
    /// # Errors
    ///
    /// Returns [`SetupError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SetupError::InvalidBaseUrl`] if `base_url` does not parse.
    pub(crate) fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        min_interval: Duration,
    ) -> Result<Self, SetupError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid_base_url(base_url, &e))?;
        let search_endpoint = base
            .join("search")
            .map_err(|e| invalid_base_url(base_url, &e))?;
        let reverse_endpoint = base
            .join("reverse")
            .map_err(|e| invalid_base_url(base_url, &e))?;

        Ok(Self {
            client,
            search_endpoint,
            reverse_endpoint,
            throttle: RequestThrottle::new(min_interval),
        })
    }

    /// Forward search scoped to `region`. Records that fail to decode are
    /// skipped.
    pub(crate) async fn search(
        &self,
        query: &str,
        region: &Region,
    ) -> Result<Vec<NominatimPlace>, GeocodingError> {
        let url = self.search_url(query, region);
        let raw: Vec<serde_json::Value> = self.request_json(url).await?;
        let places = raw
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| {
                serde_json::from_value::<NominatimPlace>(value)
                    .map_err(|e| {
                        tracing::warn!(index = i, error = %e, "skipping malformed geocoder record");
                    })
                    .ok()
            })
            .collect();
        Ok(places)
    }

    pub(crate) async fn reverse(&self, lat: f64, lon: f64) -> Result<NominatimPlace, GeocodingError> {
        let url = self.reverse_url(lat, lon);
        self.request_json(url).await
    }

    fn search_url(&self, query: &str, region: &Region) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("addressdetails", "1")
            .append_pair("limit", &SEARCH_LIMIT.to_string())
            .append_pair("countrycodes", &region.country_code)
            .append_pair("viewbox", &region.viewbox_param())
            .append_pair("bounded", "0")
            .append_pair("accept-language", ACCEPT_LANGUAGE)
            .append_pair("dedupe", "1");
        url
    }

    fn reverse_url(&self, lat: f64, lon: f64) -> Url {
        let mut url = self.reverse_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("format", "json")
            .append_pair("accept-language", ACCEPT_LANGUAGE)
            .append_pair("zoom", &REVERSE_ZOOM.to_string());
        url
    }

    /// Waits for a throttle slot, sends a GET, checks the status, and decodes
    /// the body as JSON.
    async fn request_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GeocodingError> {
        self.throttle.acquire().await;
        tracing::debug!(url = %url, "dispatching geocoder request");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimit);
        }
        if !status.is_success() {
            return Err(GeocodingError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GeocodingError::Network(format!("malformed geocoder response: {e}")))
    }
}

fn invalid_base_url(base_url: &str, err: &impl std::fmt::Display) -> SetupError {
    SetupError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: err.to_string(),
    }
}
