//! HTTP collaborators for the LuckyMap engine.
//!
//! - [`routing`] fetches route alternatives from an OSRM route service.
//! - [`geocoding`] searches places and reverse-geocodes points through
//!   Nominatim, with a short-lived in-memory cache in front of it.
//!
//! Both implement the collaborator traits defined in `luckymap-core`.

#![forbid(unsafe_code)]

pub mod geocoding;
pub mod routing;

use std::time::Duration;

use thiserror::Error;

/// User agent sent with every outgoing request.
pub const DEFAULT_USER_AGENT: &str = concat!("luckymap-engine/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for HTTP collaborator construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// How an HTTP request failed, independent of the calling collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequestFailure {
    Timeout,
    Status { status: u16, message: String },
    Network { message: String },
}

impl RequestFailure {
    pub(crate) fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = error.status() {
            return Self::Status {
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        Self::Network {
            message: error.to_string(),
        }
    }
}

/// Build a client with the shared timeout and user agent settings.
pub(crate) fn build_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<reqwest::Client, ProviderBuildError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Parse a base URL, making sure relative joins keep its path.
pub(crate) fn parse_base_url(raw: &str) -> Result<url::Url, ProviderBuildError> {
    let normalised = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    url::Url::parse(&normalised).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })
}
