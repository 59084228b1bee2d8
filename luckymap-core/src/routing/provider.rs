//! Route provider trait and the travel profiles it understands.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CandidateRoute, GeoPoint};

use super::error::RoutingError;

/// Mode of travel requested from the routing service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    /// Road network for cars and motorbikes.
    #[default]
    Driving,
    /// Pedestrian network.
    Foot,
}

impl TravelProfile {
    /// Map a client vehicle name onto a profile.
    ///
    /// Only `"foot"` selects walking; every other value, or none, drives.
    ///
    /// # Examples
    /// ```
    /// use luckymap_core::TravelProfile;
    ///
    /// assert_eq!(TravelProfile::from_vehicle(Some("foot")), TravelProfile::Foot);
    /// assert_eq!(TravelProfile::from_vehicle(Some("motorbike")), TravelProfile::Driving);
    /// assert_eq!(TravelProfile::from_vehicle(None), TravelProfile::Driving);
    /// ```
    #[must_use]
    pub fn from_vehicle(vehicle: Option<&str>) -> Self {
        match vehicle {
            Some("foot") => Self::Foot,
            _ => Self::Driving,
        }
    }

    /// Profile segment used in OSRM route URLs.
    #[must_use]
    pub const fn as_osrm_profile(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Foot => "foot",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_osrm_profile())
    }
}

/// Fetch route alternatives through an ordered list of waypoints.
///
/// Implementers return every alternative the service proposes, in the
/// service's own order. An empty list means the service found no route.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use luckymap_core::{
///     CandidateRoute, GeoPoint, RouteGeometry, RouteProvider, RoutingError, TravelProfile,
/// };
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl RouteProvider for StraightLine {
///     async fn fetch_routes(
///         &self,
///         _profile: TravelProfile,
///         waypoints: &[GeoPoint],
///     ) -> Result<Vec<CandidateRoute>, RoutingError> {
///         if waypoints.len() < 2 {
///             return Err(RoutingError::TooFewWaypoints { count: waypoints.len() });
///         }
///         let pairs: Vec<[f64; 2]> = waypoints.iter().map(|p| [p.lng, p.lat]).collect();
///         Ok(vec![CandidateRoute::new(RouteGeometry::from_lon_lat(&pairs), 0.0, 0.0)])
///     }
/// }
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let waypoints = [GeoPoint::new(21.0, 105.8), GeoPoint::new(21.1, 105.9)];
/// let routes = runtime.block_on(StraightLine.fetch_routes(TravelProfile::Driving, &waypoints))?;
/// assert_eq!(routes.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Return route alternatives visiting `waypoints` in order.
    ///
    /// Implementations must return
    /// `Err(RoutingError::TooFewWaypoints { .. })` when fewer than two
    /// waypoints are supplied.
    async fn fetch_routes(
        &self,
        profile: TravelProfile,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<CandidateRoute>, RoutingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::StubRouteProvider;

    #[rstest]
    #[case(Some("foot"), TravelProfile::Foot)]
    #[case(Some("car"), TravelProfile::Driving)]
    #[case(Some("Foot"), TravelProfile::Driving)]
    #[case(Some(""), TravelProfile::Driving)]
    #[case(None, TravelProfile::Driving)]
    fn vehicle_maps_to_profile(#[case] vehicle: Option<&str>, #[case] expected: TravelProfile) {
        assert_eq!(TravelProfile::from_vehicle(vehicle), expected);
    }

    #[rstest]
    fn profiles_render_as_osrm_segments() {
        assert_eq!(TravelProfile::Driving.to_string(), "driving");
        assert_eq!(TravelProfile::Foot.as_osrm_profile(), "foot");
    }

    #[tokio::test]
    async fn stub_rejects_single_waypoint() {
        let provider = StubRouteProvider::straight_lines();
        let err = provider
            .fetch_routes(TravelProfile::Driving, &[GeoPoint::new(21.0, 105.8)])
            .await
            .expect_err("expected TooFewWaypoints");
        assert_eq!(err, RoutingError::TooFewWaypoints { count: 1 });
    }

    #[tokio::test]
    async fn stub_records_requested_profile() {
        let provider = StubRouteProvider::straight_lines();
        let waypoints = [GeoPoint::new(21.0, 105.8), GeoPoint::new(21.1, 105.9)];
        let routes = provider
            .fetch_routes(TravelProfile::Foot, &waypoints)
            .await
            .expect("stub should answer");
        assert_eq!(routes.len(), 1);
        assert_eq!(provider.calls(), vec![(TravelProfile::Foot, 2)]);
    }
}
