//! Integration tests for `LocationSearch` against a wiremock geocoder.
//!
//! Each test stands up its own `MockServer` and its own `LocationSearch`, so
//! cache and throttle state never leak between tests.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campmap_geocode::{
    CachePolicy, FeatureCategory, GeocodingErrorCode, LocationResult, LocationSearch,
    SearchConfig,
};

const TEST_UA: &str = "campmap-test/0.1";

fn search_for(base_url: &str) -> LocationSearch {
    search_with(base_url, Duration::ZERO, Duration::from_secs(5))
}

fn search_with(base_url: &str, min_interval: Duration, timeout: Duration) -> LocationSearch {
    LocationSearch::new(SearchConfig {
        base_url: base_url.to_owned(),
        user_agent: TEST_UA.to_owned(),
        timeout,
        min_interval,
        cache: CachePolicy::default(),
        ..SearchConfig::default()
    })
    .expect("failed to build test LocationSearch")
}

fn syracuse() -> serde_json::Value {
    json!({
        "place_id": 1,
        "display_name": "Syracuse, Onondaga County, New York, United States",
        "lat": "43.0481221",
        "lon": "-76.1474244",
        "class": "place",
        "type": "city",
        "importance": "0.68",
        "address": { "city": "Syracuse", "state": "New York" },
        "boundingbox": ["42.98", "43.09", "-76.20", "-76.07"]
    })
}

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .len()
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_fixed_parameters_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "syracuse"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "5"))
        .and(query_param("countrycodes", "us"))
        .and(query_param("accept-language", "en"))
        .and(query_param("dedupe", "1"))
        .and(header("user-agent", TEST_UA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([syracuse()])))
        .mount(&server)
        .await;

    let search = search_for(&server.uri());
    let results = search.search_location("  syracuse ").await.expect("search should succeed");

    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r.display_name, "Syracuse, Onondaga County, New York, United States");
    assert!((r.latitude - 43.048_122_1).abs() < 1e-9);
    assert!((r.longitude + 76.147_424_4).abs() < 1e-9);
    assert_eq!(r.bbox, Some([-76.20, 42.98, -76.07, 43.09]));
    assert!((r.importance - 0.68).abs() < 1e-9);
    assert_eq!(r.feature_category, FeatureCategory::Administrative);
}

#[tokio::test]
async fn only_the_in_region_record_survives() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([
            {
                "display_name": "Rochester, Olmsted County, Minnesota, United States",
                "lat": "44.02", "lon": "-92.46",
                "class": "place", "type": "city", "importance": 0.7,
                "address": { "state": "Minnesota" }
            },
            {
                "display_name": "Rochester, Monroe County, United States",
                "lat": "43.15", "lon": "-77.61",
                "class": "place", "type": "city", "importance": 0.6,
                "address": { "state": "New York" }
            }
        ]),
    )
    .await;

    let results = search_for(&server.uri())
        .search_location("Rochester")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].display_name, "Rochester, Monroe County, United States");
}

#[tokio::test]
async fn natural_features_are_categorized() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([
            {
                "display_name": "Mount Marcy, Essex County, New York, United States",
                "lat": "44.11", "lon": "-73.92",
                "class": "natural", "type": "peak", "importance": 0.5
            },
            {
                "display_name": "Lake George, Warren County, New York, United States",
                "lat": "43.55", "lon": "-73.60",
                "class": "water", "type": "lake", "importance": 0.6
            }
        ]),
    )
    .await;

    let results = search_for(&server.uri())
        .search_location("adirondacks")
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    // Sorted by importance: the lake first.
    assert_eq!(results[0].feature_category, FeatureCategory::Water);
    assert_eq!(results[1].feature_category, FeatureCategory::Natural);
}

#[tokio::test]
async fn out_of_region_results_fall_back_and_are_cached() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([
            { "display_name": "Portland, Maine", "class": "place", "type": "city" },
            { "display_name": "Portland, Oregon", "class": "place", "type": "city" },
            { "display_name": "Portland Bill, Dorset", "class": "natural", "type": "cape" },
            { "display_name": "Portland, Texas", "class": "place", "type": "town" }
        ]),
    )
    .await;

    let search = search_for(&server.uri());
    let results = search.search_location("portland").await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results
        .iter()
        .all(|r| r.display_name.ends_with("(outside New York)")));
    assert!(results
        .iter()
        .all(|r| r.feature_category == FeatureCategory::Administrative));

    // Coordinates are NaN here (no lat/lon upstream), so compare by name.
    let names = |list: &[LocationResult]| {
        list.iter()
            .map(|r| r.display_name.clone())
            .collect::<Vec<_>>()
    };
    let again = search.search_location("PORTLAND").await.unwrap();
    assert_eq!(names(&again), names(&results));
    assert!(again.iter().all(|r| r.latitude.is_nan()));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn irrelevant_types_yield_empty_list() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([
            { "display_name": "Joe's Pizza, New York", "class": "amenity", "type": "restaurant" },
            { "display_name": "Gas, Ohio", "class": "amenity", "type": "fuel" }
        ]),
    )
    .await;

    let results = search_for(&server.uri())
        .search_location("pizza")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn empty_upstream_response_yields_empty_list() {
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;

    let results = search_for(&server.uri())
        .search_location("xyzzy")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn malformed_records_are_skipped() {
    let server = MockServer::start().await;
    mount_search(&server, json!([{ "lat": "1" }, syracuse()])).await;

    let results = search_for(&server.uri())
        .search_location("syracuse")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn blank_query_makes_no_request() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;

    let search = search_for(&server.uri());
    assert!(search.search_location("   ").await.unwrap().is_empty());
    assert_eq!(request_count(&server).await, 0);
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_query_hits_cache_until_cleared() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;

    let search = search_for(&server.uri());
    search.search_location("Syracuse").await.unwrap();
    search.search_location("  syracuse  ").await.unwrap();
    assert_eq!(request_count(&server).await, 1);
    assert_eq!(search.cached_searches().await, 1);

    search.clear_cache().await;
    search.search_location("syracuse").await.unwrap();
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn concurrent_identical_queries_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([syracuse()]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let search = search_for(&server.uri());
    let results = futures::future::join_all(
        ["syracuse", "Syracuse", " SYRACUSE "].map(|q| search.search_location(q)),
    )
    .await;

    for r in results {
        assert_eq!(r.expect("search should succeed").len(), 1);
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn separate_instances_do_not_share_cache() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;

    search_for(&server.uri()).search_location("syracuse").await.unwrap();
    search_for(&server.uri()).search_location("syracuse").await.unwrap();
    assert_eq!(request_count(&server).await, 2);
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_429_maps_to_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = search_for(&server.uri())
        .search_location("albany")
        .await
        .unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::RateLimit);
    assert!(err.message().contains("Too many requests"));
}

#[tokio::test]
async fn server_error_maps_to_api_error_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let search = search_for(&server.uri());
    let err = search.search_location("albany").await.unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::ApiError);

    let err = search.search_location("albany").await.unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::ApiError);
    assert_eq!(request_count(&server).await, 2);
    assert_eq!(search.cached_searches().await, 0);
}

#[tokio::test]
async fn client_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = search_for(&server.uri())
        .search_location("albany")
        .await
        .unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::ApiError);
}

#[tokio::test]
async fn connection_failure_maps_to_network_error() {
    let err = search_for("http://127.0.0.1:1")
        .search_location("albany")
        .await
        .unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::NetworkError);
}

#[tokio::test]
async fn non_json_body_maps_to_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = search_for(&server.uri())
        .search_location("albany")
        .await
        .unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::NetworkError);
}

#[tokio::test]
async fn slow_upstream_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([syracuse()]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let search = search_with(&server.uri(), Duration::ZERO, Duration::from_millis(200));
    let err = search.search_location("syracuse").await.unwrap_err();
    assert_eq!(err.code(), GeocodingErrorCode::NetworkError);
}

// ---------------------------------------------------------------------------
// Reverse geocoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reverse_geocode_returns_administrative_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "44.2795"))
        .and(query_param("lon", "-73.9799"))
        .and(query_param("zoom", "10"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "North Elba, Essex County, New York, United States",
            "lat": "44.2795",
            "lon": "-73.9799",
            "type": "town",
            "boundingbox": ["44.1", "44.4", "-74.1", "-73.8"]
        })))
        .mount(&server)
        .await;

    let result = search_for(&server.uri())
        .reverse_geocode(44.2795, -73.9799)
        .await
        .expect("reverse lookup should succeed");
    assert_eq!(result.display_name, "North Elba, Essex County, New York, United States");
    assert_eq!(result.feature_category, FeatureCategory::Administrative);
    assert_eq!(result.bbox, Some([-74.1, 44.1, -73.8, 44.4]));
}

#[tokio::test]
async fn reverse_geocode_swallows_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(search_for(&server.uri())
        .reverse_geocode(44.0, -74.0)
        .await
        .is_none());
}

#[tokio::test]
async fn reverse_geocode_swallows_rate_limit_and_error_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "1"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })))
        .mount(&server)
        .await;

    let search = search_for(&server.uri());
    assert!(search.reverse_geocode(1.0, 0.0).await.is_none());
    assert!(search.reverse_geocode(2.0, 0.0).await.is_none());
}

#[tokio::test]
async fn reverse_geocode_swallows_network_errors() {
    assert!(search_for("http://127.0.0.1:1")
        .reverse_geocode(44.0, -74.0)
        .await
        .is_none());
}

// ---------------------------------------------------------------------------
// Throttling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn back_to_back_searches_are_spaced_by_min_interval() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;

    let search = search_with(&server.uri(), Duration::from_millis(300), Duration::from_secs(5));
    let started = Instant::now();
    search.search_location("first").await.unwrap();
    search.search_location("second").await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn search_and_reverse_share_one_throttle() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(syracuse()))
        .mount(&server)
        .await;

    let search = search_with(&server.uri(), Duration::from_millis(300), Duration::from_secs(5));
    let started = Instant::now();
    search.search_location("syracuse").await.unwrap();
    search.reverse_geocode(43.0, -76.1).await;

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn cache_hits_skip_the_throttle() {
    let server = MockServer::start().await;
    mount_search(&server, json!([syracuse()])).await;

    let search = search_with(&server.uri(), Duration::from_secs(2), Duration::from_secs(5));
    search.search_location("syracuse").await.unwrap();

    let started = Instant::now();
    search.search_location("syracuse").await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(500));
}
