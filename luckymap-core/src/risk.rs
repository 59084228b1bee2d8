//! Directional risk of a route against a set of risk directions.
//!
//! A route is sampled into at most [`MAX_SEGMENTS`] segments. Each segment
//! contributes its length weighted by how closely its bearing points at the
//! nearest risk direction; the sum divided by the route length is the risk
//! ratio, which is then mapped onto a `[0, 100]` lucky score.

use geo::Coord;

use crate::geo_math::{angular_diff, bearing_between, haversine_meters};
use crate::{CandidateRoute, RiskDirections};

/// Most segments sampled from one geometry.
pub const MAX_SEGMENTS: usize = 36;

/// Angular reach of a risk direction; bearings this far away or further carry
/// no risk.
pub const MAX_INFLUENCE_DEGREES: f64 = 60.0;

/// Multiplier applied to the risk ratio before subtracting it from 100.
pub const RISK_AMPLIFICATION: f64 = 1.5;

/// Score reported for geometries with fewer than two points.
pub const NEUTRAL_LUCKY_POINT: f64 = 50.0;

/// Lucky score and risk ratio of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteScore {
    /// Score in `[0, 100]`, rounded to two decimals; higher is safer.
    pub lucky_point: f64,
    /// Share of the route facing risk, in `[0, 1]`, rounded to two decimals.
    pub risk_ratio: f64,
}

impl RouteScore {
    /// Score of a route too short to sample.
    pub const NEUTRAL: Self = Self {
        lucky_point: NEUTRAL_LUCKY_POINT,
        risk_ratio: 0.0,
    };
}

/// Round to two decimal places.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "decimal rounding")]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk in `[0, 1]` of travelling on `bearing` given `directions`.
///
/// Full risk when the bearing matches a direction exactly, falling linearly
/// to zero at [`MAX_INFLUENCE_DEGREES`].
///
/// # Examples
/// ```
/// use luckymap_core::{Direction, RiskDirections, risk_level_from_bearing};
///
/// let directions = RiskDirections::from_iter([Direction::E]);
/// assert_eq!(risk_level_from_bearing(90.0, &directions), 1.0);
/// assert_eq!(risk_level_from_bearing(120.0, &directions), 0.5);
/// assert_eq!(risk_level_from_bearing(180.0, &directions), 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "linear falloff of risk")]
pub fn risk_level_from_bearing(bearing: f64, directions: &RiskDirections) -> f64 {
    let Some(min_diff) = directions
        .iter()
        .map(|direction| angular_diff(bearing, direction.angle()))
        .min_by(f64::total_cmp)
    else {
        return 0.0;
    };
    if min_diff.is_nan() || min_diff >= MAX_INFLUENCE_DEGREES {
        return 0.0;
    }
    1.0 - min_diff / MAX_INFLUENCE_DEGREES
}

/// Indices of the points kept when sampling `point_count` points.
///
/// Every `ceil((n - 1) / MAX_SEGMENTS)`-th point is kept and the final point
/// is always included.
fn sample_indices(point_count: usize) -> Vec<usize> {
    let Some(last) = point_count.checked_sub(1) else {
        return Vec::new();
    };
    let step = last.div_ceil(MAX_SEGMENTS).max(1);
    let mut indices: Vec<usize> = (0..point_count).step_by(step).collect();
    if indices.last() != Some(&last) {
        indices.push(last);
    }
    indices
}

/// Length in metres and bearing of a segment, or `None` when it has no
/// usable length.
fn segment(from: Coord<f64>, to: Coord<f64>) -> Option<(f64, f64)> {
    let length = haversine_meters(from.y, from.x, to.y, to.x);
    if !(length.is_finite() && length > 0.0) {
        return None;
    }
    Some((length, bearing_between(from.y, from.x, to.y, to.x)))
}

/// Score `route` against `directions`.
///
/// Routes with fewer than two points receive [`RouteScore::NEUTRAL`].
/// Zero-length and non-finite segments are skipped. The risk ratio divides
/// by the reported route distance when it is positive, by the sampled length
/// otherwise, and by one when both are zero.
///
/// # Examples
/// ```
/// use luckymap_core::{CandidateRoute, Direction, RiskDirections, RouteGeometry, score_route};
///
/// let north = CandidateRoute::new(
///     RouteGeometry::from_lon_lat(&[[105.85, 21.00], [105.85, 21.01]]),
///     0.0,
///     0.0,
/// );
/// let score = score_route(&north, &RiskDirections::from_iter([Direction::N]));
/// assert_eq!(score.risk_ratio, 1.0);
/// assert_eq!(score.lucky_point, 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "distance-weighted risk accumulation"
)]
pub fn score_route(route: &CandidateRoute, directions: &RiskDirections) -> RouteScore {
    let coords = route.geometry.coords();
    if coords.len() < 2 {
        return RouteScore::NEUTRAL;
    }

    let sampled: Vec<Coord<f64>> = sample_indices(coords.len())
        .into_iter()
        .filter_map(|index| coords.get(index).copied())
        .collect();

    let (weighted_risk, sampled_distance) = sampled
        .windows(2)
        .filter_map(|pair| match pair {
            [from, to] => segment(*from, *to),
            _ => None,
        })
        .fold((0.0, 0.0), |(risk, distance), (length, bearing)| {
            (
                risk + risk_level_from_bearing(bearing, directions) * length,
                distance + length,
            )
        });

    // Any finite nonzero reported distance is trusted, negative included.
    let total = if route.distance.is_finite() && route.distance.abs() > 0.0 {
        route.distance
    } else if sampled_distance > 0.0 {
        sampled_distance
    } else {
        1.0
    };
    let risk_ratio = weighted_risk / total;
    let lucky_point = (100.0 - risk_ratio * 100.0 * RISK_AMPLIFICATION).clamp(0.0, 100.0);

    RouteScore {
        lucky_point: round2(lucky_point),
        risk_ratio: round2(risk_ratio.clamp(0.0, 1.0)),
    }
}
