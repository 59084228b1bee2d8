//! Core domain of the LuckyMap engine.
//!
//! The crate scores travel routes with the Huyền Không flying-star method.
//! A traveller's birth year and gender, together with the lunar moment of
//! departure, yield a set of risk directions; route geometries are sampled
//! against those directions into a lucky score, and route alternatives are
//! ranked and rescaled for display.
//!
//! Scoring is synchronous and free of I/O. External services are reached
//! through the [`RouteProvider`] and [`Geocoder`] traits, implemented over
//! HTTP in `luckymap-data`.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use luckymap_core::{
//!     CandidateRoute, Gender, RouteGeometry, SexagenaryCalendar, SolsticeTable, rank_routes,
//!     read_chart,
//! };
//!
//! let departure = NaiveDate::from_ymd_opt(2024, 6, 15)
//!     .and_then(|d| d.and_hms_opt(8, 30, 0))
//!     .expect("valid timestamp");
//! let chart = read_chart(
//!     1990,
//!     Gender::Male,
//!     departure,
//!     &SexagenaryCalendar,
//!     &SolsticeTable::approximate(2024..=2024),
//! );
//! let candidate = CandidateRoute::new(
//!     RouteGeometry::from_lon_lat(&[[105.8542, 21.0285], [105.8433, 21.0045]]),
//!     2_900.0,
//!     420.0,
//! );
//! let ranked = rank_routes(vec![candidate], &chart.risk_directions);
//! assert_eq!(ranked.len(), 1);
//! assert!((0.0..=100.0).contains(&ranked[0].lucky_point));
//! ```

#![forbid(unsafe_code)]

pub mod astrology;
pub mod geo_math;
pub mod geocoding;
pub mod planner;
pub mod ranking;
pub mod request;
pub mod risk;
pub mod route;
pub mod routing;

#[doc(hidden)]
pub mod test_support;

pub use astrology::{
    ChartReading, DayBranch, Direction, Gender, HalfOfYear, LunarCalendar, LunarMoment, MonthDay,
    RiskDirections, SexagenaryCalendar, SolsticeTable, SolsticeTableError, YearSolstices,
    classify_half_of_year, compute_center_from_day_hour, compute_center_number,
    compute_risk_directions, read_chart,
};
pub use geocoding::{GeocodeError, Geocoder, MIN_QUERY_LEN, Place, normalise_query};
pub use planner::{DETOUR_DELTA_DEGREES, LuckyRoutePlanner, route_variants};
pub use ranking::{MAX_RANKED_ROUTES, RemapPolicy, rank_routes};
pub use request::{
    LooseNumber, LoosePoint, LuckyRouteQuery, LuckyRouteRequest, LuckyRouteResponse,
    RequestError, parse_local_datetime, vietnam_now,
};
pub use risk::{RouteScore, risk_level_from_bearing, score_route};
pub use route::{CandidateRoute, GeoPoint, RouteGeometry, ScoredRoute};
pub use routing::{RouteProvider, RoutingError, TravelProfile};
