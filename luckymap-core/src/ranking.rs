//! Ranking, deduplication and rescaling of scored route alternatives.
//!
//! Raw lucky scores cluster wherever the chart happens to put the risk
//! directions. The best kept route is lifted into a display band with a
//! single [`RemapPolicy`] applied to every kept route, so the relative order
//! never changes.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::risk::{round2, score_route};
use crate::{CandidateRoute, RiskDirections, ScoredRoute};

/// Most routes kept after deduplication.
pub const MAX_RANKED_ROUTES: usize = 5;

/// Precision used when comparing route endpoints, in decimal places.
const ENDPOINT_SCALE: f64 = 100_000.0;

/// Rescaling applied to every kept route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemapPolicy {
    /// Scores are already high enough to show as-is.
    Identity,
    /// Multiply by the factor.
    Scale(f64),
    /// Add the offset.
    Offset(f64),
}

impl RemapPolicy {
    /// Choose the policy from the best raw score among kept routes.
    ///
    /// | best raw score | policy                  |
    /// |----------------|-------------------------|
    /// | above 80       | identity                |
    /// | 70 to 80       | scale by `(max+15)/max` |
    /// | 60 to 70       | scale by `(max+25)/max` |
    /// | 50 to 60       | scale by `(max+35)/max` |
    /// | below 50       | add 50                  |
    ///
    /// # Examples
    /// ```
    /// use luckymap_core::RemapPolicy;
    ///
    /// assert_eq!(RemapPolicy::from_max_raw(90.0), RemapPolicy::Identity);
    /// assert_eq!(RemapPolicy::from_max_raw(75.0), RemapPolicy::Scale(90.0 / 75.0));
    /// assert_eq!(RemapPolicy::from_max_raw(20.0), RemapPolicy::Offset(50.0));
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "band scaling factors")]
    pub fn from_max_raw(max_raw: f64) -> Self {
        if max_raw > 80.0 {
            return Self::Identity;
        }
        if max_raw < 50.0 {
            return Self::Offset(50.0);
        }
        let lift = if max_raw >= 70.0 {
            15.0
        } else if max_raw >= 60.0 {
            25.0
        } else {
            35.0
        };
        if max_raw > 0.0 {
            Self::Scale((max_raw + lift) / max_raw)
        } else {
            Self::Scale(1.0)
        }
    }

    /// Apply the policy, clamping to `[0, 100]` and rounding to two decimals.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "score rescaling")]
    pub fn rescale(self, score: f64) -> f64 {
        let remapped = match self {
            Self::Identity => score,
            Self::Scale(factor) => score * factor,
            Self::Offset(offset) => score + offset,
        };
        round2(remapped.clamp(0.0, 100.0))
    }
}

/// Key identifying routes that are the same path in practice.
#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    distance: i64,
    points: usize,
    first: (i64, i64),
    last: (i64, i64),
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "quantise to a fixed number of decimals for comparison"
)]
fn quantise(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

impl DedupKey {
    fn of(route: &ScoredRoute) -> Option<Self> {
        let first = route.geometry.first()?;
        let last = route.geometry.last()?;
        Some(Self {
            distance: quantise(route.distance, 1.0),
            points: route.geometry.len(),
            first: (
                quantise(first.x, ENDPOINT_SCALE),
                quantise(first.y, ENDPOINT_SCALE),
            ),
            last: (
                quantise(last.x, ENDPOINT_SCALE),
                quantise(last.y, ENDPOINT_SCALE),
            ),
        })
    }
}

/// Score every candidate against `directions`, preserving input order.
#[must_use]
pub fn score_candidates(
    candidates: Vec<CandidateRoute>,
    directions: &RiskDirections,
) -> Vec<ScoredRoute> {
    candidates
        .into_iter()
        .map(|route| {
            let score = score_route(&route, directions);
            ScoredRoute::new(route, score.lucky_point, score.risk_ratio)
        })
        .collect()
}

/// Sort by lucky score, best first, keeping the input order for ties.
pub fn sort_by_lucky_point(routes: &mut [ScoredRoute]) {
    routes.sort_by(compare_lucky_desc);
}

/// Keep the first route of each distinct path, up to
/// [`MAX_RANKED_ROUTES`], and number them from zero.
///
/// Routes with fewer than two points are dropped.
#[must_use]
pub fn dedup_top(routes: Vec<ScoredRoute>) -> Vec<ScoredRoute> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(MAX_RANKED_ROUTES);
    for route in routes {
        if kept.len() >= MAX_RANKED_ROUTES {
            break;
        }
        if route.geometry.len() < 2 {
            continue;
        }
        let Some(key) = DedupKey::of(&route) else {
            continue;
        };
        if seen.insert(key) {
            kept.push(route);
        }
    }
    for (index, route) in kept.iter_mut().enumerate() {
        route.index = index;
    }
    kept
}

/// Rescale kept routes in place and return the policy used.
pub fn rescale_routes(routes: &mut [ScoredRoute]) -> RemapPolicy {
    let max_raw = routes
        .iter()
        .map(|route| route.lucky_point)
        .max_by(f64::total_cmp)
        .unwrap_or(0.0);
    let policy = RemapPolicy::from_max_raw(max_raw);
    for route in routes.iter_mut() {
        let base = route.lucky_point;
        let remapped = policy.rescale(base);
        route.lucky_point_base = base;
        route.lucky_point_raw = remapped;
        route.lucky_point = remapped;
    }
    policy
}

/// Score, order, deduplicate and rescale route candidates.
///
/// # Examples
/// ```
/// use luckymap_core::{CandidateRoute, Direction, RiskDirections, RouteGeometry, rank_routes};
///
/// let north = CandidateRoute::new(
///     RouteGeometry::from_lon_lat(&[[105.85, 21.00], [105.85, 21.01]]),
///     1_112.0,
///     90.0,
/// );
/// let east = CandidateRoute::new(
///     RouteGeometry::from_lon_lat(&[[105.85, 21.00], [105.86, 21.00]]),
///     1_038.0,
///     80.0,
/// );
/// let ranked = rank_routes(vec![north, east], &RiskDirections::from_iter([Direction::N]));
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].index, 0);
/// assert!(ranked[0].lucky_point >= ranked[1].lucky_point);
/// ```
#[must_use]
pub fn rank_routes(candidates: Vec<CandidateRoute>, directions: &RiskDirections) -> Vec<ScoredRoute> {
    let candidate_count = candidates.len();
    let mut scored = score_candidates(candidates, directions);
    sort_by_lucky_point(&mut scored);
    let mut kept = dedup_top(scored);
    let policy = rescale_routes(&mut kept);
    log::debug!(
        "ranked {candidate_count} candidates into {} routes using {policy:?}",
        kept.len()
    );
    kept
}

/// Compare two scored routes by displayed score, best first.
#[must_use]
pub fn compare_lucky_desc(a: &ScoredRoute, b: &ScoredRoute) -> Ordering {
    b.lucky_point.total_cmp(&a.lucky_point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteGeometry;
    use rstest::{fixture, rstest};

    fn scored(lucky: f64, distance: f64, pairs: &[[f64; 2]]) -> ScoredRoute {
        ScoredRoute::new(
            CandidateRoute::new(RouteGeometry::from_lon_lat(pairs), distance, 60.0),
            lucky,
            0.0,
        )
    }

    #[fixture]
    fn line() -> Vec<[f64; 2]> {
        vec![[105.85, 21.0], [105.85, 21.01]]
    }

    #[rstest]
    #[case(80.01, RemapPolicy::Identity)]
    #[case(80.0, RemapPolicy::Scale(95.0 / 80.0))]
    #[case(70.0, RemapPolicy::Scale(85.0 / 70.0))]
    #[case(69.99, RemapPolicy::Scale((69.99 + 25.0) / 69.99))]
    #[case(60.0, RemapPolicy::Scale(85.0 / 60.0))]
    #[case(50.0, RemapPolicy::Scale(85.0 / 50.0))]
    #[case(49.99, RemapPolicy::Offset(50.0))]
    #[case(0.0, RemapPolicy::Offset(50.0))]
    fn policy_bands(#[case] max_raw: f64, #[case] expected: RemapPolicy) {
        assert_eq!(RemapPolicy::from_max_raw(max_raw), expected);
    }

    #[rstest]
    #[case(RemapPolicy::Identity, 42.0, 42.0)]
    #[case(RemapPolicy::Scale(2.0), 60.0, 100.0)]
    #[case(RemapPolicy::Offset(50.0), 20.0, 70.0)]
    #[case(RemapPolicy::Offset(50.0), 70.0, 100.0)]
    fn rescale_clamps(#[case] policy: RemapPolicy, #[case] score: f64, #[case] expected: f64) {
        assert_eq!(policy.rescale(score), expected);
    }

    #[rstest]
    fn best_route_in_low_band_reaches_band_top() {
        let mut routes = vec![scored(75.0, 1_000.0, &[[0.0, 0.0], [0.0, 1.0]])];
        rescale_routes(&mut routes);
        assert_eq!(routes[0].lucky_point, 90.0);
        assert_eq!(routes[0].lucky_point_base, 75.0);
        assert_eq!(routes[0].lucky_point_raw, 90.0);
    }

    #[rstest]
    fn offset_band_lifts_by_fifty() {
        let mut routes = vec![
            scored(30.0, 1_000.0, &[[0.0, 0.0], [0.0, 1.0]]),
            scored(10.0, 2_000.0, &[[0.0, 0.0], [1.0, 0.0]]),
        ];
        rescale_routes(&mut routes);
        assert_eq!(routes[0].lucky_point, 80.0);
        assert_eq!(routes[1].lucky_point, 60.0);
    }

    #[rstest]
    fn dedup_keeps_first_of_each_path(line: Vec<[f64; 2]>) {
        let routes = vec![
            scored(90.0, 1_000.2, &line),
            scored(80.0, 999.9, &line),
            scored(70.0, 1_500.0, &line),
        ];
        let kept = dedup_top(routes);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].lucky_point, 90.0);
        assert_eq!(kept[1].distance, 1_500.0);
        assert_eq!(kept[1].index, 1);
    }

    #[rstest]
    fn dedup_ignores_sub_precision_endpoint_noise() {
        let kept = dedup_top(vec![
            scored(90.0, 1_000.0, &[[105.850_001, 21.0], [105.85, 21.01]]),
            scored(80.0, 1_000.0, &[[105.850_002, 21.0], [105.85, 21.01]]),
        ]);
        assert_eq!(kept.len(), 1);
    }

    #[rstest]
    fn dedup_drops_degenerate_geometries(line: Vec<[f64; 2]>) {
        let kept = dedup_top(vec![
            scored(50.0, 0.0, &[]),
            scored(50.0, 0.0, &[[105.85, 21.0]]),
            scored(40.0, 1_000.0, &line),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].index, 0);
    }

    #[rstest]
    fn dedup_caps_at_five() {
        let routes = (0..8_u32)
            .map(|i| scored(50.0, f64::from(i) * 100.0, &[[0.0, 0.0], [0.0, 1.0]]))
            .collect();
        let kept = dedup_top(routes);
        assert_eq!(kept.len(), MAX_RANKED_ROUTES);
        let indices: Vec<usize> = kept.iter().map(|route| route.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn sort_is_stable_for_ties() {
        let mut routes = vec![
            scored(50.0, 1.0, &[[0.0, 0.0], [0.0, 1.0]]),
            scored(60.0, 2.0, &[[0.0, 0.0], [0.0, 1.0]]),
            scored(50.0, 3.0, &[[0.0, 0.0], [0.0, 1.0]]),
        ];
        sort_by_lucky_point(&mut routes);
        let distances: Vec<f64> = routes.iter().map(|route| route.distance).collect();
        assert_eq!(distances, vec![2.0, 1.0, 3.0]);
    }

    #[rstest]
    fn empty_candidates_rank_to_nothing() {
        assert!(rank_routes(Vec::new(), &RiskDirections::empty()).is_empty());
    }

    #[rstest]
    fn ranking_preserves_order_after_rescale() {
        let directions = RiskDirections::from_iter([crate::Direction::N]);
        let candidates = vec![
            CandidateRoute::new(
                RouteGeometry::from_lon_lat(&[[105.85, 21.0], [105.85, 21.01]]),
                0.0,
                0.0,
            ),
            CandidateRoute::new(
                RouteGeometry::from_lon_lat(&[[105.85, 21.0], [105.86, 21.0]]),
                0.0,
                0.0,
            ),
            CandidateRoute::new(
                RouteGeometry::from_lon_lat(&[[105.85, 21.0], [105.855, 21.01]]),
                0.0,
                0.0,
            ),
        ];
        let ranked = rank_routes(candidates, &directions);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|pair| match pair {
            [a, b] => compare_lucky_desc(a, b) != Ordering::Greater,
            _ => true,
        }));
        assert!(ranked.iter().all(|route| route.lucky_point_base <= route.lucky_point));
    }
}
