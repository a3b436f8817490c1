//! Text search for geographic places via the Google Places API.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Upper bound on returned candidates.
pub const MAX_RESULTS: usize = 8;

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

/// A ranked place candidate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct PlaceSearchResult {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider credential is absent. Operator-fixable, not retryable.
    #[error("Google Maps API key not configured")]
    MissingApiKey,

    /// Upstream failure. Transient; the caller may retry.
    #[error("search provider error: {0}")]
    Provider(String),
}

/// Seam over the search provider so tools and tests can substitute a stub.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Up to [`MAX_RESULTS`] ranked candidates for a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<PlaceSearchResult>, SearchError>;
}

/// Google Places text-search client.
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Read the credential from `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("GOOGLE_MAPS_API_KEY").ok())
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSearchResult>, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SearchError::MissingApiKey);
        };

        let response = self
            .http
            .get(TEXT_SEARCH_URL)
            .query(&[("query", query.trim()), ("key", api_key)])
            .send()
            .await
            .map_err(|e| SearchError::Provider(e.to_string()))?
            .error_for_status()
            .map_err(|e| SearchError::Provider(e.to_string()))?;

        let body: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Provider(e.to_string()))?;

        if let Some(status) = body.status.as_deref() {
            if status != "OK" && status != "ZERO_RESULTS" {
                tracing::warn!(status, "places text search returned error status");
                return Err(SearchError::Provider(status.to_string()));
            }
        }

        Ok(map_results(body.results))
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<RawPlace>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lng: f64,
}

fn map_results(raw: Vec<RawPlace>) -> Vec<PlaceSearchResult> {
    raw.into_iter()
        .take(MAX_RESULTS)
        .map(|place| {
            let location = place.geometry.and_then(|g| g.location);
            PlaceSearchResult {
                place_id: place.place_id.unwrap_or_default(),
                name: place.name.unwrap_or_default(),
                address: place.formatted_address.unwrap_or_default(),
                latitude: location.as_ref().map(|l| l.lat).unwrap_or_default(),
                longitude: location.as_ref().map(|l| l.lng).unwrap_or_default(),
            }
        })
        .collect()
}
