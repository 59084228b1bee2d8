//! Plan lucky routes for one traveller and one departure.
//!
//! The planner asks the routing service for the direct route and for four
//! small detours through points beside the midpoint, so that even services
//! returning a single alternative yield a handful of candidates. Every
//! candidate is scored against the traveller's risk directions and the best
//! distinct ones are returned.

use futures_util::future::join_all;

use crate::{
    GeoPoint, LuckyRouteRequest, LuckyRouteResponse, LunarCalendar, RouteProvider,
    SexagenaryCalendar, SolsticeTable, rank_routes, read_chart,
};

/// Offset of each detour waypoint from the midpoint, in degrees.
pub const DETOUR_DELTA_DEGREES: f64 = 0.004;

/// Waypoint lists to request: the direct route, then detours north, south,
/// east and west of the midpoint.
///
/// # Examples
/// ```
/// use luckymap_core::{GeoPoint, route_variants};
///
/// let variants = route_variants(GeoPoint::new(21.0, 105.8), GeoPoint::new(21.1, 105.9));
/// assert_eq!(variants.len(), 5);
/// assert_eq!(variants[0].len(), 2);
/// assert!(variants[1..].iter().all(|waypoints| waypoints.len() == 3));
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "midpoint and detour offsets")]
pub fn route_variants(origin: GeoPoint, destination: GeoPoint) -> Vec<Vec<GeoPoint>> {
    let mid = GeoPoint::new(
        (origin.lat + destination.lat) / 2.0,
        (origin.lng + destination.lng) / 2.0,
    );
    let detours = [
        GeoPoint::new(mid.lat + DETOUR_DELTA_DEGREES, mid.lng),
        GeoPoint::new(mid.lat - DETOUR_DELTA_DEGREES, mid.lng),
        GeoPoint::new(mid.lat, mid.lng + DETOUR_DELTA_DEGREES),
        GeoPoint::new(mid.lat, mid.lng - DETOUR_DELTA_DEGREES),
    ];
    std::iter::once(vec![origin, destination])
        .chain(
            detours
                .into_iter()
                .map(|via| vec![origin, via, destination]),
        )
        .collect()
}

/// Combines a routing service with the flying-star chart.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use luckymap_core::{
///     Gender, GeoPoint, LuckyRoutePlanner, LuckyRouteRequest, SolsticeTable, TravelProfile,
///     test_support::StubRouteProvider,
/// };
///
/// let planner = LuckyRoutePlanner::new(
///     StubRouteProvider::straight_lines(),
///     SolsticeTable::approximate(2024..=2024),
/// );
/// let request = LuckyRouteRequest {
///     origin: GeoPoint::new(21.0285, 105.8542),
///     destination: GeoPoint::new(21.0045, 105.8433),
///     birth_year: 1990,
///     gender: Gender::Male,
///     profile: TravelProfile::Driving,
///     local_time: NaiveDate::from_ymd_opt(2024, 6, 15)
///         .and_then(|d| d.and_hms_opt(8, 30, 0))
///         .expect("valid timestamp"),
/// };
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let response = runtime.block_on(planner.plan(&request));
/// assert_eq!(response.nine_qi, 1);
/// // Straight-line detours mirror each other in length, so the north and
/// // south variants collapse into one, as do east and west.
/// assert_eq!(response.routes.len(), 3);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct LuckyRoutePlanner<P> {
    provider: P,
    calendar: Box<dyn LunarCalendar>,
    solstices: SolsticeTable,
}

impl<P: std::fmt::Debug> std::fmt::Debug for LuckyRoutePlanner<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuckyRoutePlanner")
            .field("provider", &self.provider)
            .field("calendar", &"<dyn LunarCalendar>")
            .field("solstices", &self.solstices.len())
            .finish()
    }
}

impl<P: RouteProvider> LuckyRoutePlanner<P> {
    /// Create a planner using the [`SexagenaryCalendar`].
    #[must_use]
    pub fn new(provider: P, solstices: SolsticeTable) -> Self {
        Self {
            provider,
            calendar: Box::new(SexagenaryCalendar),
            solstices,
        }
    }

    /// Replace the lunar calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: impl LunarCalendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    /// Routing service in use.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Read the chart, fetch every variant concurrently and rank the result.
    ///
    /// Variants whose fetch fails contribute no candidates; the failure is
    /// logged and planning continues.
    pub async fn plan(&self, request: &LuckyRouteRequest) -> LuckyRouteResponse {
        let chart = read_chart(
            request.birth_year,
            request.gender,
            request.local_time,
            self.calendar.as_ref(),
            &self.solstices,
        );

        let variants = route_variants(request.origin, request.destination);
        let fetches = variants
            .iter()
            .map(|waypoints| self.provider.fetch_routes(request.profile, waypoints));
        let candidates: Vec<_> = join_all(fetches)
            .await
            .into_iter()
            .enumerate()
            .flat_map(|(variant, result)| match result {
                Ok(routes) => routes,
                Err(err) => {
                    log::warn!("route variant {variant} failed: {err}");
                    Vec::new()
                }
            })
            .collect();

        LuckyRouteResponse {
            birth_year: request.birth_year,
            nine_qi: chart.nine_qi,
            center: chart.center,
            routes: rank_routes(candidates, &chart.risk_directions),
            risk_directions: chart.risk_directions,
        }
    }
}
