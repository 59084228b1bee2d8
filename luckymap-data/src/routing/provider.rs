//! HTTP-based `RouteProvider` using OSRM's Route API.
//!
//! Each request asks for alternatives with simplified GeoJSON geometries:
//!
//! ```text
//! {base_url}/route/v1/{profile}/{lon,lat;lon,lat;...}
//!     ?overview=simplified&geometries=geojson&alternatives=true
//! ```

use std::time::Duration;

use async_trait::async_trait;
use luckymap_core::{CandidateRoute, GeoPoint, RouteProvider, RoutingError, TravelProfile};
use reqwest::Client;
use url::Url;

use super::osrm::RouteResponse;
use crate::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, RequestFailure, build_client,
    parse_base_url,
};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone)]
pub struct HttpRouteProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRouteProviderConfig {
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

/// HTTP route provider using the OSRM Route API.
///
/// `"NoRoute"` answers become an empty list; every other failure is reported
/// as a [`RoutingError`] carrying the request URL.
#[derive(Debug, Clone)]
pub struct HttpRouteProvider {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Build the OSRM Route API URL for the given waypoints.
    fn build_route_url(
        &self,
        profile: TravelProfile,
        waypoints: &[GeoPoint],
    ) -> Result<Url, RoutingError> {
        let coords = waypoints
            .iter()
            .map(|point| format!("{},{}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");
        let mut url = self
            .base_url
            .join(&format!("route/v1/{}/{coords}", profile.as_osrm_profile()))
            .map_err(|err| RoutingError::ParseError {
                message: format!("cannot build route URL: {err}"),
            })?;
        url.query_pairs_mut()
            .append_pair("overview", "simplified")
            .append_pair("geometries", "geojson")
            .append_pair("alternatives", "true");
        Ok(url)
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> RoutingError {
        let url = url.to_string();
        match RequestFailure::classify(error) {
            RequestFailure::Timeout => RoutingError::Timeout {
                url,
                timeout_secs: self.timeout.as_secs(),
            },
            RequestFailure::Status { status, message } => RoutingError::HttpError {
                url,
                status,
                message,
            },
            RequestFailure::Network { message } => RoutingError::NetworkError { url, message },
        }
    }

    /// Convert an OSRM response to candidate routes.
    fn convert_response(response: RouteResponse) -> Result<Vec<CandidateRoute>, RoutingError> {
        if response.is_no_route() {
            return Ok(Vec::new());
        }
        if !response.is_ok() {
            return Err(RoutingError::ServiceError {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }
        Ok(response
            .routes
            .unwrap_or_default()
            .into_iter()
            .map(CandidateRoute::from)
            .collect())
    }
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    async fn fetch_routes(
        &self,
        profile: TravelProfile,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<CandidateRoute>, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        let url = self.build_route_url(profile, waypoints)?;

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // OSRM answers `NoRoute` and `InvalidQuery` with 4xx statuses and a
        // JSON body, so the body is decoded before the status is checked.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(decoded) => Self::convert_response(decoded),
            Err(_) if !status.is_success() => Err(RoutingError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            }),
            Err(err) => Err(RoutingError::ParseError {
                message: err.to_string(),
            }),
        }
    }
}
