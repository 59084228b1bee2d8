//! OSRM API response types for the Route service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use luckymap_core::{CandidateRoute, RouteGeometry};
use serde::Deserialize;

/// Code OSRM returns when no route connects the waypoints.
pub const NO_ROUTE: &str = "NoRoute";

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoRoute"` - No route found between the waypoints
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Route alternatives, best first according to OSRM.
    #[serde(default)]
    pub routes: Option<Vec<OsrmRoute>>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if OSRM found no route at all.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == NO_ROUTE
    }
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// GeoJSON `LineString` of the route.
    pub geometry: RouteGeometry,
    /// Distance in metres.
    #[serde(default)]
    pub distance: f64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl From<OsrmRoute> for CandidateRoute {
    fn from(route: OsrmRoute) -> Self {
        Self::new(route.geometry, route.distance, route.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": {"type": "LineString", "coordinates": [[105.85, 21.02], [105.84, 21.03]]},
                "distance": 1520.4,
                "duration": 240.1,
                "weight": 240.1,
                "legs": []
            }],
            "waypoints": []
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let routes = response.routes.expect("should have routes");
        assert_eq!(routes.len(), 1);
        let candidate = CandidateRoute::from(routes.into_iter().next().expect("one route"));
        assert_eq!(candidate.geometry.len(), 2);
        assert_eq!(candidate.distance, 1520.4);
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{"code": "InvalidQuery", "message": "Query string malformed"}"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(!response.is_no_route());
        assert_eq!(response.message.as_deref(), Some("Query string malformed"));
        assert!(response.routes.is_none());
    }

    #[test]
    fn deserialise_no_route_response() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_no_route());
    }
}
