//! Spherical helpers for bearings and distances between WGS84 points.
//!
//! All angles are in degrees. The functions are total for finite input and
//! propagate `NaN` for non-finite input; callers filter those out.

/// Mean Earth radius used for haversine distances, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Initial great-circle bearing from point 1 to point 2.
///
/// The result is normalised into `[0, 360)`, with 0 pointing north and 90
/// pointing east.
///
/// # Examples
/// ```
/// use luckymap_core::geo_math::bearing_between;
///
/// let east = bearing_between(0.0, 0.0, 0.0, 1.0);
/// assert!((east - 90.0).abs() < 1e-9);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "forward azimuth requires trigonometric maths"
)]
pub fn bearing_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let degrees = y.atan2(x).to_degrees();
    (degrees + 360.0) % 360.0
}

/// Great-circle distance in metres using the haversine formula.
///
/// # Examples
/// ```
/// use luckymap_core::geo_math::haversine_meters;
///
/// let metres = haversine_meters(0.0, 0.0, 0.0, 1.0);
/// assert!((metres - 111_194.93).abs() < 0.01);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine distance requires trigonometric maths"
)]
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let half_chord = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_METERS * central_angle
}

/// Absolute difference between two bearings along the shorter arc.
///
/// # Examples
/// ```
/// use luckymap_core::geo_math::angular_diff;
///
/// assert_eq!(angular_diff(350.0, 10.0), 20.0);
/// assert_eq!(angular_diff(90.0, 270.0), 180.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "circular difference of angles")]
pub fn angular_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}
