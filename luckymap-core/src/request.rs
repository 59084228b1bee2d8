//! Lucky-route request and response model.
//!
//! [`LuckyRouteQuery`] mirrors the JSON body sent by map clients, which is
//! loosely typed: coordinates and the birth year may arrive as numbers or as
//! numeric strings. [`LuckyRouteRequest::from_query`] validates it into a
//! strongly typed request.

use chrono::{FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Gender, GeoPoint, RiskDirections, ScoredRoute, TravelProfile};

/// Civil timezone of every request, in seconds east of UTC.
pub const VIETNAM_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Accepted layouts of the optional `datetime` field.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A JSON value that should hold a number but may be a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// A JSON number.
    Number(f64),
    /// A JSON string expected to hold a number.
    Text(String),
}

impl LooseNumber {
    /// Numeric value, or `None` when the text does not parse.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A point as sent by clients; either component may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoosePoint {
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<LooseNumber>,
    /// Longitude in degrees.
    #[serde(default)]
    pub lng: Option<LooseNumber>,
}

impl From<GeoPoint> for LoosePoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: Some(point.lat.into()),
            lng: Some(point.lng.into()),
        }
    }
}

/// Body of a lucky-route request as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckyRouteQuery {
    /// Start of the trip.
    #[serde(default)]
    pub origin: Option<LoosePoint>,
    /// End of the trip.
    #[serde(default)]
    pub destination: Option<LoosePoint>,
    /// Traveller's birth year.
    #[serde(default)]
    pub birth_year: Option<LooseNumber>,
    /// Traveller's gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Vehicle name; `"foot"` walks, anything else drives.
    #[serde(default)]
    pub vehicle: Option<String>,
    /// Local departure time, `YYYY-MM-DDTHH:MM` with optional seconds.
    #[serde(default)]
    pub datetime: Option<String>,
}

/// Errors returned by [`LuckyRouteRequest::from_query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A required field was absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// A coordinate was not a finite number.
    #[error("invalid coordinate in `{field}`")]
    InvalidCoordinate {
        /// Wire name of the point holding the coordinate.
        field: &'static str,
    },
    /// The birth year was not a whole number.
    #[error("invalid birth year `{value}`")]
    InvalidBirthYear {
        /// Value as received.
        value: String,
    },
}

/// A validated lucky-route request.
#[derive(Debug, Clone, PartialEq)]
pub struct LuckyRouteRequest {
    /// Start of the trip.
    pub origin: GeoPoint,
    /// End of the trip.
    pub destination: GeoPoint,
    /// Traveller's birth year.
    pub birth_year: i32,
    /// Traveller's gender.
    pub gender: Gender,
    /// Routing profile.
    pub profile: TravelProfile,
    /// Departure time in Vietnam civil time.
    pub local_time: NaiveDateTime,
}

impl LuckyRouteRequest {
    /// Validate a query.
    ///
    /// A missing or malformed `datetime` falls back to `now`.
    ///
    /// # Errors
    /// Returns [`RequestError::MissingField`] when the origin, destination,
    /// birth year or gender is absent, [`RequestError::InvalidCoordinate`]
    /// when a coordinate is missing or not finite, and
    /// [`RequestError::InvalidBirthYear`] when the birth year is not a whole
    /// number.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use luckymap_core::{Gender, LuckyRouteQuery, LuckyRouteRequest, TravelProfile};
    ///
    /// let query: LuckyRouteQuery = serde_json::from_str(
    ///     r#"{"origin": {"lat": "21.03", "lng": 105.85},
    ///         "destination": {"lat": 21.00, "lng": 105.80},
    ///         "birthYear": 1990, "gender": "male", "vehicle": "foot",
    ///         "datetime": "2024-06-15T08:30"}"#,
    /// )?;
    /// let now = NaiveDate::from_ymd_opt(2024, 1, 1)
    ///     .and_then(|d| d.and_hms_opt(0, 0, 0))
    ///     .expect("valid timestamp");
    /// let request = LuckyRouteRequest::from_query(query, now)?;
    /// assert_eq!(request.origin.lat, 21.03);
    /// assert_eq!(request.gender, Gender::Male);
    /// assert_eq!(request.profile, TravelProfile::Foot);
    /// assert_eq!(request.local_time.to_string(), "2024-06-15 08:30:00");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_query(query: LuckyRouteQuery, now: NaiveDateTime) -> Result<Self, RequestError> {
        let origin = query
            .origin
            .ok_or(RequestError::MissingField { field: "origin" })?;
        let destination = query.destination.ok_or(RequestError::MissingField {
            field: "destination",
        })?;
        let birth_year = query
            .birth_year
            .ok_or(RequestError::MissingField { field: "birthYear" })
            .and_then(|raw| parse_birth_year(&raw))?;
        let gender = query
            .gender
            .ok_or(RequestError::MissingField { field: "gender" })?;

        Ok(Self {
            origin: resolve_point(&origin, "origin")?,
            destination: resolve_point(&destination, "destination")?,
            birth_year,
            gender,
            profile: TravelProfile::from_vehicle(query.vehicle.as_deref()),
            local_time: query
                .datetime
                .as_deref()
                .and_then(parse_local_datetime)
                .unwrap_or(now),
        })
    }
}

fn resolve_point(point: &LoosePoint, field: &'static str) -> Result<GeoPoint, RequestError> {
    let component = |value: Option<&LooseNumber>| {
        value
            .and_then(LooseNumber::as_f64)
            .filter(|v| v.is_finite())
            .ok_or(RequestError::InvalidCoordinate { field })
    };
    Ok(GeoPoint::new(
        component(point.lat.as_ref())?,
        component(point.lng.as_ref())?,
    ))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is checked to be integral and within i32 range"
)]
fn parse_birth_year(raw: &LooseNumber) -> Result<i32, RequestError> {
    let invalid = || RequestError::InvalidBirthYear {
        value: match raw {
            LooseNumber::Number(value) => value.to_string(),
            LooseNumber::Text(text) => text.clone(),
        },
    };
    let year = match raw {
        LooseNumber::Text(text) => text.trim().parse::<i32>().map_err(|_| invalid())?,
        LooseNumber::Number(value) => {
            let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(value);
            if !in_range || value.fract() != 0.0 {
                return Err(invalid());
            }
            *value as i32
        }
    };
    if year == 0 {
        return Err(RequestError::MissingField { field: "birthYear" });
    }
    Ok(year)
}

/// Parse a client `datetime` string as Vietnam civil time.
///
/// # Examples
/// ```
/// use luckymap_core::parse_local_datetime;
///
/// assert!(parse_local_datetime("2024-06-15T08:30").is_some());
/// assert!(parse_local_datetime("2024-06-15T08:30:45").is_some());
/// assert!(parse_local_datetime("2024-13-15T08:30").is_none());
/// assert!(parse_local_datetime("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_local_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// Current Vietnam civil time.
#[must_use]
pub fn vietnam_now() -> NaiveDateTime {
    let now = Utc::now();
    FixedOffset::east_opt(VIETNAM_UTC_OFFSET_SECS)
        .map_or_else(|| now.naive_utc(), |zone| now.with_timezone(&zone).naive_local())
}

/// Ranked routes and the chart they were scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckyRouteResponse {
    /// Traveller's birth year.
    pub birth_year: i32,
    /// Personal number.
    pub nine_qi: u8,
    /// Centre number of the departure moment.
    pub center: u8,
    /// Directions to avoid.
    pub risk_directions: RiskDirections,
    /// At most five ranked routes, best first.
    pub routes: Vec<ScoredRoute>,
}
