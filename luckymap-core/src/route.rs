//! Route candidates returned by a routing provider and their scored form.
//!
//! Geometries store WGS84 coordinates as [`geo::Coord`] with
//! `x = longitude` and `y = latitude`, and serialise as GeoJSON
//! `LineString` objects so they can be drawn on a map unchanged.

use geo::Coord;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A latitude/longitude pair in degrees, as exchanged with clients.
///
/// # Examples
/// ```
/// use luckymap_core::GeoPoint;
///
/// let hanoi = GeoPoint::new(21.0285, 105.8542);
/// assert_eq!(hanoi.to_coord().x, 105.8542);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Construct a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Convert into a `geo` coordinate (`x = lng`, `y = lat`).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

/// Ordered polyline of a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGeometry(pub Vec<Coord<f64>>);

impl RouteGeometry {
    /// Build a geometry from `[lon, lat]` pairs.
    ///
    /// # Examples
    /// ```
    /// use luckymap_core::RouteGeometry;
    ///
    /// let geometry = RouteGeometry::from_lon_lat(&[[105.85, 21.02], [105.84, 21.03]]);
    /// assert_eq!(geometry.len(), 2);
    /// ```
    #[must_use]
    pub fn from_lon_lat(pairs: &[[f64; 2]]) -> Self {
        Self(pairs.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    /// Coordinates in order.
    #[must_use]
    pub const fn coords(&self) -> &[Coord<f64>] {
        self.0.as_slice()
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the geometry has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First point, if any.
    #[must_use]
    pub fn first(&self) -> Option<Coord<f64>> {
        self.0.first().copied()
    }

    /// Last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<Coord<f64>> {
        self.0.last().copied()
    }
}

#[derive(Serialize)]
struct LineStringOut<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: &'a [[f64; 2]],
}

#[derive(Deserialize)]
struct LineStringIn {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    coordinates: Vec<[f64; 2]>,
}

const LINE_STRING: &str = "LineString";

impl Serialize for RouteGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<[f64; 2]> = self.0.iter().map(|c| [c.x, c.y]).collect();
        LineStringOut {
            kind: LINE_STRING,
            coordinates: &pairs,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RouteGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = LineStringIn::deserialize(deserializer)?;
        match raw.kind.as_deref() {
            None | Some(LINE_STRING) => Ok(Self::from_lon_lat(&raw.coordinates)),
            Some(other) => Err(D::Error::custom(format!(
                "expected a LineString geometry, found {other}"
            ))),
        }
    }
}

/// A route alternative as returned by the routing provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    /// Polyline of the route.
    pub geometry: RouteGeometry,
    /// Reported total distance in metres.
    pub distance: f64,
    /// Reported total duration in seconds.
    pub duration: f64,
}

impl CandidateRoute {
    /// Construct a candidate route.
    #[must_use]
    pub const fn new(geometry: RouteGeometry, distance: f64, duration: f64) -> Self {
        Self {
            geometry,
            distance,
            duration,
        }
    }
}

/// A candidate route annotated with its risk and lucky scores.
///
/// `lucky_point` is the displayed score; after ranking it equals
/// `lucky_point_raw`, the rescaled value, while `lucky_point_base` keeps the
/// score before rescaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRoute {
    /// Displayed lucky score in `[0, 100]`.
    pub lucky_point: f64,
    /// Distance-weighted share of the route facing risk directions, `[0, 1]`.
    pub risk_ratio: f64,
    /// Lucky score before rescaling.
    pub lucky_point_base: f64,
    /// Lucky score after rescaling.
    pub lucky_point_raw: f64,
    /// Rank among the kept routes, starting at 0.
    pub index: usize,
    /// Reported total distance in metres.
    pub distance: f64,
    /// Reported total duration in seconds.
    pub duration: f64,
    /// Polyline of the route.
    pub geometry: RouteGeometry,
}

impl ScoredRoute {
    /// Attach a score to a candidate; rescaling fields start at the base score.
    #[must_use]
    pub fn new(route: CandidateRoute, lucky_point: f64, risk_ratio: f64) -> Self {
        Self {
            lucky_point,
            risk_ratio,
            lucky_point_base: lucky_point,
            lucky_point_raw: lucky_point,
            index: 0,
            distance: route.distance,
            duration: route.duration,
            geometry: route.geometry,
        }
    }
}
