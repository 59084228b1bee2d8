use thiserror::Error;

/// Errors from [`crate::RouteProvider::fetch_routes`].
///
/// Network-related variants carry the request URL so failures can be traced
/// back to a specific routing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Fewer than two waypoints were supplied.
    #[error("at least two waypoints are required, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints received.
        count: usize,
    },
    /// The request did not complete within the configured timeout.
    #[error("routing request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("routing request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("routing request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },
    /// The service reported an application-level error code.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, such as `InvalidQuery`.
        code: String,
        /// Error detail.
        message: String,
    },
}
