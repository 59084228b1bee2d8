//! Facade crate for the LuckyMap route engine.
//!
//! This crate re-exports the flying-star chart, route scoring and ranking
//! API, and exposes the HTTP routing and geocoding collaborators behind the
//! `http` feature.

#![forbid(unsafe_code)]

pub use luckymap_core::{
    CandidateRoute, ChartReading, Direction, Gender, GeoPoint, GeocodeError, Geocoder,
    LuckyRoutePlanner, LuckyRouteQuery, LuckyRouteRequest, LuckyRouteResponse, LunarCalendar,
    Place, RequestError, RiskDirections, RouteGeometry, RouteProvider, RouteScore, RoutingError,
    ScoredRoute, SexagenaryCalendar, SolsticeTable, TravelProfile, compute_center_number,
    compute_risk_directions, rank_routes, read_chart, score_route,
};

#[cfg(feature = "http")]
pub use luckymap_data::{
    ProviderBuildError,
    geocoding::{CachedGeocoder, NominatimGeocoder},
    routing::HttpRouteProvider,
};
