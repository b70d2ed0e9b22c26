//! MapQuest radius search client
//!
//! Looks up points of interest around a site's postal code. Responses go
//! through the cache like every other request, but are keyed without the API
//! credential so the key never ends up in the cache file.

use serde::Deserialize;
use thiserror::Error;

use super::{NationalSite, Place};
use crate::fetch::{FetchError, Fetcher, Transport};

/// Base URL for the MapQuest radius search API
const MAPQUEST_RADIUS_URL: &str = "http://www.mapquestapi.com/search/v2/radius";

/// Search radius in miles around the origin
const SEARCH_RADIUS: u32 = 10;

/// Maximum number of results requested
const MAX_MATCHES: u32 = 10;

/// Errors that can occur when looking up nearby places
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Fetching the search results failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Failed to parse JSON response
    #[error("Failed to parse places response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API reported a failure, e.g. an invalid key
    #[error("Places API returned status {status}: {message}")]
    Api { status: i64, message: String },

    /// The response has no result list
    #[error("Places response is missing 'searchResults'")]
    MissingResults,
}

/// Client for nearby place searches
#[derive(Debug, Clone)]
pub struct PlacesClient {
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    /// Create a client for the MapQuest API with the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(MAPQUEST_RADIUS_URL, api_key)
    }

    /// Create a client with a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Query string shared by the request URL and the cache key
    fn search_params(&self, origin: &str) -> String {
        format!(
            "origin={}&radius={}&maxMatches={}&ambiguities=ignore&outFormat=json",
            origin, SEARCH_RADIUS, MAX_MATCHES
        )
    }

    /// Full request URL, including the credential
    pub fn request_url(&self, origin: &str) -> String {
        format!(
            "{}?key={}&{}",
            self.base_url,
            self.api_key,
            self.search_params(origin)
        )
    }

    /// Cache key for a search: the request URL without the credential
    pub fn cache_key(&self, origin: &str) -> String {
        format!("{}?{}", self.base_url, self.search_params(origin))
    }

    /// Fetch places near the given site's postal code
    ///
    /// # Returns
    /// * `Ok(Vec<Place>)` - Results in API order, possibly empty
    /// * `Err(PlacesError)` - If the request or parsing fails; failed
    ///   responses are not cached
    pub async fn nearby<T: Transport>(
        &self,
        fetcher: &mut Fetcher<T>,
        site: &NationalSite,
    ) -> Result<Vec<Place>, PlacesError> {
        fetcher
            .fetch_parsed(
                &self.cache_key(&site.zipcode),
                &self.request_url(&site.zipcode),
                parse_places,
            )
            .await
    }
}

/// Parses a radius search response body
///
/// A non-zero `info.statuscode` or an absent `searchResults` list is an error.
pub fn parse_places(body: &str) -> Result<Vec<Place>, PlacesError> {
    let response: RadiusSearchResponse = serde_json::from_str(body)?;

    if let Some(info) = response.info {
        if info.statuscode != 0 {
            return Err(PlacesError::Api {
                status: info.statuscode,
                message: info.messages.join("; "),
            });
        }
    }

    let results = response.search_results.ok_or(PlacesError::MissingResults)?;

    Ok(results
        .into_iter()
        .map(|result| Place {
            name: result.name,
            category: non_empty(result.fields.group_sic_code_name),
            address: non_empty(result.fields.address),
            city: non_empty(result.fields.city),
        })
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// MapQuest API response structures

#[derive(Debug, Deserialize)]
struct RadiusSearchResponse {
    #[serde(default)]
    info: Option<ResponseInfo>,
    #[serde(default, rename = "searchResults")]
    search_results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct ResponseInfo {
    #[serde(default)]
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    #[serde(default)]
    fields: ResultFields,
}

#[derive(Debug, Default, Deserialize)]
struct ResultFields {
    #[serde(default)]
    group_sic_code_name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::fetch::testing::StubTransport;
    use std::time::Duration;
    use tempfile::TempDir;

    const SAMPLE_RESPONSE: &str = r#"{
        "resultsCount": 3,
        "searchResults": [
            {
                "name": "Rock Harbor Lodge",
                "fields": {
                    "group_sic_code_name": "Hotels & Motels",
                    "address": "1 Rock Harbor",
                    "city": "Houghton"
                }
            },
            {
                "name": "Trailhead",
                "fields": {
                    "group_sic_code_name": "",
                    "address": "",
                    "city": ""
                }
            },
            {
                "name": "Bare Result"
            }
        ]
    }"#;

    const ERROR_RESPONSE: &str = r#"{
        "info": {
            "statuscode": 403,
            "messages": ["This key is not authorized for this service."]
        }
    }"#;

    fn sample_site() -> NationalSite {
        NationalSite {
            category: "National Park".to_string(),
            name: "Isle Royale".to_string(),
            address: "Houghton, MI".to_string(),
            zipcode: "49931".to_string(),
            phone: "(906) 482-0984".to_string(),
        }
    }

    #[test]
    fn test_request_url_contains_all_params() {
        let client = PlacesClient::new("SECRET");

        assert_eq!(
            client.request_url("49931"),
            "http://www.mapquestapi.com/search/v2/radius?key=SECRET&origin=49931&radius=10&maxMatches=10&ambiguities=ignore&outFormat=json"
        );
    }

    #[test]
    fn test_cache_key_omits_credential() {
        let client = PlacesClient::new("SECRET");
        let key = client.cache_key("49931");

        assert!(!key.contains("SECRET"));
        assert_eq!(
            key,
            "http://www.mapquestapi.com/search/v2/radius?origin=49931&radius=10&maxMatches=10&ambiguities=ignore&outFormat=json"
        );
        assert_eq!(key, PlacesClient::new("OTHER").cache_key("49931"));
    }

    #[test]
    fn test_parse_places_maps_empty_fields_to_none() {
        let places = parse_places(SAMPLE_RESPONSE).unwrap();

        assert_eq!(places.len(), 3);
        assert_eq!(places[0].category.as_deref(), Some("Hotels & Motels"));
        assert_eq!(places[0].city.as_deref(), Some("Houghton"));
        assert_eq!(places[1].name, "Trailhead");
        assert!(places[1].category.is_none());
        assert!(places[1].address.is_none());
        assert!(places[1].city.is_none());
        assert!(places[2].category.is_none());
    }

    #[test]
    fn test_parse_places_without_results_fails() {
        let result = parse_places(r#"{"info": {"statuscode": 0}}"#);
        assert!(matches!(result, Err(PlacesError::MissingResults)));
    }

    #[test]
    fn test_parse_places_empty_results() {
        let places = parse_places(r#"{"info": {"statuscode": 0}, "searchResults": []}"#).unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_parse_places_api_error_status() {
        let result = parse_places(ERROR_RESPONSE);

        match result {
            Err(PlacesError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("not authorized"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_places_invalid_json() {
        let result = parse_places("<html>Service Unavailable</html>");
        assert!(matches!(result, Err(PlacesError::Parse(_))));
    }

    #[tokio::test]
    async fn test_nearby_caches_without_credential() {
        let client = PlacesClient::new("SECRET");
        let transport = StubTransport::with(&[(client.request_url("49931").as_str(), SAMPLE_RESPONSE)]);
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::load(temp_dir.path().join("cache.json"));
        let mut fetcher = Fetcher::new(store, transport).with_min_delay(Duration::ZERO);

        let places = client.nearby(&mut fetcher, &sample_site()).await.unwrap();
        assert_eq!(places.len(), 3);

        let again = client.nearby(&mut fetcher, &sample_site()).await.unwrap();
        assert_eq!(again, places);

        let on_disk = std::fs::read_to_string(fetcher.store().path()).unwrap();
        assert!(!on_disk.contains("SECRET"));
        assert!(fetcher.store().contains_key(&client.cache_key("49931")));
    }

    #[tokio::test]
    async fn test_error_payload_is_not_cached_for_next_key() {
        let bad = PlacesClient::new("BADKEY");
        let good = PlacesClient::new("GOODKEY");
        let transport = StubTransport::with(&[
            (bad.request_url("49931").as_str(), ERROR_RESPONSE),
            (good.request_url("49931").as_str(), SAMPLE_RESPONSE),
        ]);
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::load(temp_dir.path().join("cache.json"));
        let mut fetcher = Fetcher::new(store, transport).with_min_delay(Duration::ZERO);

        let result = bad.nearby(&mut fetcher, &sample_site()).await;
        assert!(matches!(result, Err(PlacesError::Api { status: 403, .. })));
        assert!(fetcher.store().is_empty());

        let places = good.nearby(&mut fetcher, &sample_site()).await.unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(fetcher.transport().call_count(), 2);
        assert!(fetcher.store().contains_key(&good.cache_key("49931")));
    }
}
