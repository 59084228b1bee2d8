//! Deterministic collaborators used by unit, behaviour and doc tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::geo_math::haversine_meters;
use crate::{
    CandidateRoute, GeoPoint, GeocodeError, Geocoder, Place, RouteGeometry, RouteProvider,
    RoutingError, TravelProfile,
};

#[derive(Debug)]
enum StubRoutes {
    StraightLines,
    Fixed(Vec<CandidateRoute>),
    Failing(RoutingError),
    FailingCalls {
        calls: Vec<usize>,
        error: RoutingError,
    },
}

/// `RouteProvider` answering from memory and recording each request.
#[derive(Debug)]
pub struct StubRouteProvider {
    routes: StubRoutes,
    calls: Mutex<Vec<(TravelProfile, usize)>>,
}

impl StubRouteProvider {
    fn from_routes(routes: StubRoutes) -> Self {
        Self {
            routes,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer each request with one polyline straight through the waypoints.
    #[must_use]
    pub fn straight_lines() -> Self {
        Self::from_routes(StubRoutes::StraightLines)
    }

    /// Answer every request with the same routes.
    #[must_use]
    pub fn with_routes(routes: Vec<CandidateRoute>) -> Self {
        Self::from_routes(StubRoutes::Fixed(routes))
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn failing(error: RoutingError) -> Self {
        Self::from_routes(StubRoutes::Failing(error))
    }

    /// Fail the requests at the given positions in call order with `error`
    /// and answer every other one like [`Self::straight_lines`].
    #[must_use]
    pub fn failing_calls(calls: Vec<usize>, error: RoutingError) -> Self {
        Self::from_routes(StubRoutes::FailingCalls { calls, error })
    }

    /// Profile and waypoint count of every request so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(TravelProfile, usize)> {
        self.calls.lock().clone()
    }
}

fn straight_line(waypoints: &[GeoPoint]) -> CandidateRoute {
    let distance = waypoints
        .windows(2)
        .map(|pair| match pair {
            [a, b] => haversine_meters(a.lat, a.lng, b.lat, b.lng),
            _ => 0.0,
        })
        .sum();
    let coords = waypoints.iter().map(|point| point.to_coord()).collect();
    CandidateRoute::new(RouteGeometry(coords), distance, 0.0)
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
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
        let position = {
            let mut calls = self.calls.lock();
            calls.push((profile, waypoints.len()));
            calls.len().saturating_sub(1)
        };
        match &self.routes {
            StubRoutes::StraightLines => Ok(vec![straight_line(waypoints)]),
            StubRoutes::Fixed(routes) => Ok(routes.clone()),
            StubRoutes::Failing(error) => Err(error.clone()),
            StubRoutes::FailingCalls { calls, error } if calls.contains(&position) => {
                Err(error.clone())
            }
            StubRoutes::FailingCalls { .. } => Ok(vec![straight_line(waypoints)]),
        }
    }
}

/// `Geocoder` answering from memory and counting lookups.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    places: Vec<Place>,
    address: Option<String>,
    error: Option<GeocodeError>,
    lookups: AtomicUsize,
}

impl StubGeocoder {
    /// Answer searches with `places` and reverse lookups with `address`.
    #[must_use]
    pub const fn new(places: Vec<Place>, address: Option<String>) -> Self {
        Self {
            places,
            address,
            error: None,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Fail every lookup with `error`.
    #[must_use]
    pub fn failing(error: GeocodeError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Number of lookups served so far, including failed ones.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), GeocodeError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.error.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn search(&self, _query: &str) -> Result<Vec<Place>, GeocodeError> {
        self.record()?;
        Ok(self.places.clone())
    }

    async fn reverse(&self, _point: GeoPoint) -> Result<Option<String>, GeocodeError> {
        self.record()?;
        Ok(self.address.clone())
    }
}
