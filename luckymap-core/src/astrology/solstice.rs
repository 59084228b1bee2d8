//! Summer and winter solstice days per calendar year.
//!
//! The table decides which half of the year a local timestamp falls in. It is
//! normally loaded from a compact JSON file keyed by year:
//!
//! ```json
//! { "2024": { "summer": { "month": 6, "day": 21 }, "winter": { "month": 12, "day": 21 } } }
//! ```
//!
//! When no file is available, [`SolsticeTable::approximate`] derives the days
//! from mean solstice instants.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset between the Julian Day Number and chrono's day count from the
/// common era.
const JDN_FROM_CE_OFFSET: f64 = 1_721_425.0;

/// Hours east of UTC for the civil timezone the table is expressed in.
const LOCAL_UTC_OFFSET_HOURS: f64 = 7.0;

/// A calendar day within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, `1..=12`.
    pub month: u32,
    /// Day of month, `1..=31`.
    pub day: u32,
}

impl MonthDay {
    /// Resolve the day within `year`, or `None` for impossible dates.
    #[must_use]
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

/// Solstice days of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSolstices {
    /// June solstice.
    pub summer: MonthDay,
    /// December solstice.
    pub winter: MonthDay,
}

/// Errors raised while loading a [`SolsticeTable`].
#[derive(Debug, Error)]
pub enum SolsticeTableError {
    /// The JSON payload could not be decoded.
    #[error("failed to parse solstice table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lookup of solstice days keyed by calendar year.
///
/// # Examples
/// ```
/// use luckymap_core::SolsticeTable;
///
/// let json = r#"{"2024": {"summer": {"month": 6, "day": 21}, "winter": {"month": 12, "day": 21}}}"#;
/// let table = SolsticeTable::from_json_str(json)?;
/// assert!(table.get(2024).is_some());
/// assert!(table.get(1999).is_none());
/// # Ok::<(), luckymap_core::SolsticeTableError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolsticeTable {
    years: BTreeMap<i32, YearSolstices>,
}

impl SolsticeTable {
    /// Build a table from explicit entries.
    #[must_use]
    pub fn new(years: BTreeMap<i32, YearSolstices>) -> Self {
        Self { years }
    }

    /// Parse the compact JSON representation.
    ///
    /// # Errors
    /// Returns [`SolsticeTableError::Parse`] when the payload is not a map of
    /// years to solstice days.
    pub fn from_json_str(json: &str) -> Result<Self, SolsticeTableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Derive solstice days for `years` from mean solstice instants.
    ///
    /// Uses the polynomial fits of Meeus, *Astronomical Algorithms*, table 27,
    /// converted to UTC+7 civil dates. The mean instants are within an hour or
    /// so of the true ones, which only matters when a solstice falls close to
    /// local midnight.
    #[must_use]
    pub fn approximate(years: RangeInclusive<i32>) -> Self {
        let entries = years
            .filter_map(|year| {
                let summer = local_date_of(mean_june_solstice_jd(year))?;
                let winter = local_date_of(mean_december_solstice_jd(year))?;
                Some((
                    year,
                    YearSolstices {
                        summer: month_day(summer),
                        winter: month_day(winter),
                    },
                ))
            })
            .collect();
        Self::new(entries)
    }

    /// Solstice days for `year`, if known.
    #[must_use]
    pub fn get(&self, year: i32) -> Option<&YearSolstices> {
        self.years.get(&year)
    }

    /// Number of years in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

fn month_day(date: NaiveDate) -> MonthDay {
    use chrono::Datelike;
    MonthDay {
        month: date.month(),
        day: date.day(),
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "Julian dates are floored into whole civil days"
)]
fn local_date_of(julian_date: f64) -> Option<NaiveDate> {
    let local_jdn = (julian_date + 0.5 + LOCAL_UTC_OFFSET_HOURS / 24.0).floor();
    let days_from_ce = local_jdn - JDN_FROM_CE_OFFSET;
    if !days_from_ce.is_finite() || days_from_ce.abs() > f64::from(i32::MAX) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days_from_ce as i32)
}

#[expect(
    clippy::float_arithmetic,
    reason = "solstice polynomials are evaluated in floating point"
)]
fn mean_june_solstice_jd(year: i32) -> f64 {
    if year < 1000 {
        let y = f64::from(year) / 1000.0;
        1_721_233.254_01 + 365_241.725_62 * y - 0.053_23 * y.powi(2)
            + 0.009_07 * y.powi(3)
            + 0.000_25 * y.powi(4)
    } else {
        let y = f64::from(year - 2000) / 1000.0;
        2_451_716.567_67 + 365_241.626_03 * y + 0.003_25 * y.powi(2) + 0.008_88 * y.powi(3)
            - 0.000_30 * y.powi(4)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "solstice polynomials are evaluated in floating point"
)]
fn mean_december_solstice_jd(year: i32) -> f64 {
    if year < 1000 {
        let y = f64::from(year) / 1000.0;
        1_721_414.399_87 + 365_242.882_57 * y
            - 0.007_69 * y.powi(2)
            - 0.009_33 * y.powi(3)
            - 0.000_06 * y.powi(4)
    } else {
        let y = f64::from(year - 2000) / 1000.0;
        2_451_900.059_52 + 365_242.740_49 * y - 0.062_23 * y.powi(2) - 0.008_23 * y.powi(3)
            + 0.000_32 * y.powi(4)
    }
}
