//! Place search and reverse geocoding.
//!
//! The [`Geocoder`] trait abstracts the address lookup service that feeds
//! origin and destination autocompletion. Results are advisory: callers that
//! serve end users are expected to absorb failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GeoPoint;

/// Minimum trimmed query length worth sending to a geocoder.
pub const MIN_QUERY_LEN: usize = 3;

/// A place matched by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Human-readable address.
    pub display_name: String,
    /// Position of the place.
    pub location: GeoPoint,
    /// Broad classification such as `amenity` or `highway`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Specific classification such as `cafe` or `primary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Errors from [`Geocoder`] lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request did not complete within the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("geocoding request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("geocoding request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },
}

/// Look up places by free text and addresses by position.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Places matching `query`, best match first.
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;

    /// Address of the place at `point`, if the service knows one.
    async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GeocodeError>;
}

/// Normalise a free-text query, or `None` when it is too short to search.
///
/// # Examples
/// ```
/// use luckymap_core::normalise_query;
///
/// assert_eq!(normalise_query("  Hồ Gươm "), Some("Hồ Gươm"));
/// assert_eq!(normalise_query(" ab "), None);
/// ```
#[must_use]
pub fn normalise_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (trimmed.chars().count() >= MIN_QUERY_LEN).then_some(trimmed)
}
