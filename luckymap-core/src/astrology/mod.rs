//! Flying-star (Huyền Không Phi Tinh) readings for a person and a moment.
//!
//! A reading combines two numbers in `1..=9`:
//! - the personal number (Nine Qi), fixed by birth year and gender;
//! - the centre number of the moment, derived from the lunar day branch, the
//!   hour branch and the half of the solar year.
//!
//! Rotating the Lo Shu ring so that it starts at the centre number places the
//! five-yellow star and the personal star in palaces; those palaces and their
//! opposites become the risk directions.

mod calendar;
mod direction;
mod solstice;

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub use calendar::{DayBranch, LunarCalendar, LunarMoment, SexagenaryCalendar};
pub use direction::{Direction, RiskDirections};
pub use solstice::{MonthDay, SolsticeTable, SolsticeTableError, YearSolstices};

/// Reference year of the Nine Qi cycle.
const NINE_QI_EPOCH: i32 = 1864;

/// Star whose palace, and its opposite, is always unfavourable.
const FIVE_YELLOW: u8 = 5;

/// Gender of the traveller, which selects the Nine Qi formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male formula: `10 - offset`.
    Male,
    /// Female formula: `5 + offset`.
    Female,
}

/// Half of the solar year, split at the solstices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfOfYear {
    /// From the winter solstice up to the day before the summer solstice.
    First,
    /// From the summer solstice up to the day before the winter solstice.
    Last,
}

/// Wrap any integer into `1..=9`, mapping multiples of nine to 9.
fn wrap_nine(value: i32) -> u8 {
    match u8::try_from(value.rem_euclid(9)) {
        Ok(0) | Err(_) => 9,
        Ok(wrapped) => wrapped,
    }
}

/// Personal number (Nine Qi) for a birth year and gender.
///
/// The result is always in `1..=9` and repeats every nine years, including
/// for years before 1864.
///
/// # Examples
/// ```
/// use luckymap_core::{Gender, compute_center_number};
///
/// assert_eq!(compute_center_number(1990, Gender::Male), 1);
/// assert_eq!(compute_center_number(1990, Gender::Female), 5);
/// ```
#[must_use]
pub fn compute_center_number(birth_year: i32, gender: Gender) -> u8 {
    let offset = birth_year.wrapping_sub(NINE_QI_EPOCH).rem_euclid(9);
    let value = match gender {
        Gender::Male => 10 - offset,
        Gender::Female => 5 + offset,
    };
    wrap_nine(value)
}

/// Decide which half of the solar year `local` falls in.
///
/// Solstice days start at local midnight. Years missing from the table, or
/// entries naming impossible dates, default to [`HalfOfYear::First`].
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use luckymap_core::{HalfOfYear, SolsticeTable, classify_half_of_year};
///
/// let table = SolsticeTable::approximate(2024..=2024);
/// let july = NaiveDate::from_ymd_opt(2024, 7, 1)
///     .and_then(|d| d.and_hms_opt(9, 0, 0))
///     .expect("valid timestamp");
/// assert_eq!(classify_half_of_year(july, &table), HalfOfYear::Last);
/// ```
#[must_use]
pub fn classify_half_of_year(local: NaiveDateTime, table: &SolsticeTable) -> HalfOfYear {
    let year = local.year();
    let Some(entry) = table.get(year) else {
        return HalfOfYear::First;
    };
    let (Some(summer), Some(winter)) = (entry.summer.in_year(year), entry.winter.in_year(year))
    else {
        return HalfOfYear::First;
    };
    let summer_start = summer.and_time(NaiveTime::MIN);
    let winter_start = winter.and_time(NaiveTime::MIN);

    if local < summer_start {
        HalfOfYear::First
    } else if local < winter_start {
        HalfOfYear::Last
    } else {
        HalfOfYear::First
    }
}

/// Base offset of the day branch's group of four.
const fn day_group_offset(branch: DayBranch) -> i32 {
    match branch {
        DayBranch::Ty | DayBranch::Mao | DayBranch::Ngo | DayBranch::Dau => 1,
        DayBranch::Suu | DayBranch::Thin | DayBranch::Mui | DayBranch::Tuat => 4,
        DayBranch::Dan | DayBranch::Ti | DayBranch::Than | DayBranch::Hoi => 7,
    }
}

/// Centre number of the moment from its day branch and hour branch.
///
/// In the last half of the year the number is reflected to `10 - centre`.
///
/// # Examples
/// ```
/// use luckymap_core::{DayBranch, HalfOfYear, compute_center_from_day_hour};
///
/// assert_eq!(compute_center_from_day_hour(DayBranch::Ty, 4, HalfOfYear::First), 5);
/// assert_eq!(compute_center_from_day_hour(DayBranch::Suu, 4, HalfOfYear::First), 8);
/// assert_eq!(compute_center_from_day_hour(DayBranch::Suu, 4, HalfOfYear::Last), 2);
/// ```
#[must_use]
pub fn compute_center_from_day_hour(
    day_branch: DayBranch,
    hour_branch_index: u8,
    half: HalfOfYear,
) -> u8 {
    let center = wrap_nine(day_group_offset(day_branch) + i32::from(hour_branch_index));
    match half {
        HalfOfYear::First => center,
        HalfOfYear::Last => 10 - center,
    }
}

/// Position of `star` in the ring rotated to start at `center`.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "the flying-star ring is a modulo-nine rotation"
)]
fn ring_position(center: u8, star: u8) -> Option<usize> {
    (0..9_u8)
        .map(|i| (center + i + 8) % 9 + 1)
        .position(|value| value == star)
}

/// Risk directions for a centre number and a personal number.
///
/// The palaces of the five-yellow star and of the personal star, together
/// with their opposites, are flagged. The centre palace and positions
/// outside the eight directions are ignored, so at most four directions are
/// returned.
///
/// # Examples
/// ```
/// use luckymap_core::{Direction, compute_risk_directions};
///
/// let directions = compute_risk_directions(1, 1);
/// assert_eq!(directions.as_slice(), &[Direction::S, Direction::N]);
/// ```
#[must_use]
pub fn compute_risk_directions(center: u8, personal_number: u8) -> RiskDirections {
    if !(1..=9).contains(&center) {
        return RiskDirections::empty();
    }
    let mut positions: Vec<usize> = Vec::with_capacity(4);
    for star in [FIVE_YELLOW, personal_number] {
        if let Some(index) = ring_position(center, star) {
            positions.push(index);
            positions.push(if index == 0 { 0 } else { 9 - index });
        }
    }

    let mut kept: Vec<usize> = Vec::with_capacity(4);
    for position in positions {
        if position != 0 && !kept.contains(&position) {
            kept.push(position);
        }
    }
    kept.into_iter()
        .filter_map(Direction::from_ring_position)
        .collect()
}

/// Everything derived from a traveller and a moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartReading {
    /// Personal number from birth year and gender.
    pub nine_qi: u8,
    /// Centre number of the moment.
    pub center: u8,
    /// Half of the solar year the moment falls in.
    pub half: HalfOfYear,
    /// Lunar snapshot of the moment.
    pub moment: LunarMoment,
    /// Directions to avoid.
    pub risk_directions: RiskDirections,
}

/// Compute the full reading for a traveller at a local timestamp.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use luckymap_core::{Gender, SexagenaryCalendar, SolsticeTable, read_chart};
///
/// let local = NaiveDate::from_ymd_opt(2024, 6, 15)
///     .and_then(|d| d.and_hms_opt(8, 30, 0))
///     .expect("valid timestamp");
/// let table = SolsticeTable::approximate(2024..=2024);
/// let reading = read_chart(1990, Gender::Male, local, &SexagenaryCalendar, &table);
/// assert_eq!(reading.nine_qi, 1);
/// assert!(reading.risk_directions.len() <= 4);
/// ```
#[must_use]
pub fn read_chart(
    birth_year: i32,
    gender: Gender,
    local: NaiveDateTime,
    calendar: &dyn LunarCalendar,
    solstices: &SolsticeTable,
) -> ChartReading {
    let moment = calendar.lunar_moment(local);
    let half = classify_half_of_year(local, solstices);
    let center = compute_center_from_day_hour(moment.day_branch, moment.hour_branch_index, half);
    let nine_qi = compute_center_number(birth_year, gender);
    let risk_directions = compute_risk_directions(center, nine_qi);
    log::debug!(
        "chart for {birth_year} at {local}: day {}, hour {}, {half:?} half, centre {center}, nine qi {nine_qi}, risk {:?}",
        moment.day_branch,
        moment.hour_branch_index,
        risk_directions.as_slice()
    );
    ChartReading {
        nine_qi,
        center,
        half,
        moment,
        risk_directions,
    }
}
