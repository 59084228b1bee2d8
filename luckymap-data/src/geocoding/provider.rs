//! HTTP-based `Geocoder` using the Nominatim search and reverse APIs.

use std::time::Duration;

use async_trait::async_trait;
use luckymap_core::{GeoPoint, GeocodeError, Geocoder, Place};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::nominatim::{ReverseResult, SearchResult};
use crate::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, RequestFailure, build_client,
    parse_base_url,
};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const SEARCH_LIMIT: &str = "10";
const REVERSE_ZOOM: &str = "18";
const ACCEPT_LANGUAGE: &str = "vi";

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimGeocoderConfig {
    /// Base URL of the Nominatim service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests. Nominatim's usage policy requires
    /// one that identifies the application.
    pub user_agent: String,
}

impl Default for NominatimGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimGeocoderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Geocoder backed by a Nominatim server, answering in Vietnamese.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl NominatimGeocoder {
    /// Create a geocoder with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimGeocoderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: NominatimGeocoderConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GeocodeError> {
        self.base_url
            .join(path)
            .map_err(|err| GeocodeError::ParseError {
                message: format!("cannot build geocoding URL: {err}"),
            })
    }

    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("q", query)
            .append_pair("addressdetails", "1")
            .append_pair("limit", SEARCH_LIMIT)
            .append_pair("accept-language", ACCEPT_LANGUAGE);
        Ok(url)
    }

    fn reverse_url(&self, point: GeoPoint) -> Result<Url, GeocodeError> {
        let mut url = self.endpoint("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &point.lat.to_string())
            .append_pair("lon", &point.lng.to_string())
            .append_pair("zoom", REVERSE_ZOOM)
            .append_pair("addressdetails", "1")
            .append_pair("accept-language", ACCEPT_LANGUAGE);
        Ok(url)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> GeocodeError {
        let url = url.to_string();
        match RequestFailure::classify(error) {
            RequestFailure::Timeout => GeocodeError::Timeout {
                url,
                timeout_secs: self.timeout.as_secs(),
            },
            RequestFailure::Status { status, message } => GeocodeError::HttpError {
                url,
                status,
                message,
            },
            RequestFailure::Network { message } => GeocodeError::NetworkError { url, message },
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GeocodeError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        response
            .json::<T>()
            .await
            .map_err(|err| GeocodeError::ParseError {
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let url = self.search_url(query)?;
        let results: Vec<SearchResult> = self.get_json(url).await?;
        let total = results.len();
        let places: Vec<Place> = results
            .into_iter()
            .filter_map(SearchResult::into_place)
            .collect();
        if places.len() < total {
            log::debug!(
                "dropped {} search results with malformed coordinates",
                total.saturating_sub(places.len())
            );
        }
        Ok(places)
    }

    async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GeocodeError> {
        let url = self.reverse_url(point)?;
        let result: ReverseResult = self.get_json(url).await?;
        if let Some(reason) = &result.error {
            log::debug!("reverse geocoding found nothing: {reason}");
        }
        Ok(result.display_name)
    }
}
