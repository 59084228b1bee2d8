//! Lunar-calendar moments and the calendar abstraction that produces them.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Offset between chrono's day count from the common era and the Julian Day
/// Number of the same civil date.
const JDN_FROM_CE_OFFSET: i64 = 1_721_425;

/// Offset aligning the Julian Day Number with the sexagenary day cycle, so
/// that `(jdn + 49) mod 60 == 0` on a Giáp Tý day.
const SEXAGENARY_DAY_OFFSET: i64 = 49;

/// The twelve earthly branches (Địa Chi) in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayBranch {
    /// Tý (Rat).
    Ty,
    /// Sửu (Ox).
    Suu,
    /// Dần (Tiger).
    Dan,
    /// Mão (Cat).
    Mao,
    /// Thìn (Dragon).
    Thin,
    /// Tỵ (Snake).
    Ti,
    /// Ngọ (Horse).
    Ngo,
    /// Mùi (Goat).
    Mui,
    /// Thân (Monkey).
    Than,
    /// Dậu (Rooster).
    Dau,
    /// Tuất (Dog).
    Tuat,
    /// Hợi (Pig).
    Hoi,
}

impl DayBranch {
    /// Branches in cycle order, starting at Tý.
    pub const ALL: [Self; 12] = [
        Self::Ty,
        Self::Suu,
        Self::Dan,
        Self::Mao,
        Self::Thin,
        Self::Ti,
        Self::Ngo,
        Self::Mui,
        Self::Than,
        Self::Dau,
        Self::Tuat,
        Self::Hoi,
    ];

    /// Branch at `index` in the cycle, wrapping modulo 12.
    ///
    /// # Examples
    /// ```
    /// use luckymap_core::DayBranch;
    ///
    /// assert_eq!(DayBranch::from_cycle_index(6), DayBranch::Ngo);
    /// assert_eq!(DayBranch::from_cycle_index(-1), DayBranch::Hoi);
    /// ```
    #[must_use]
    pub fn from_cycle_index(index: i64) -> Self {
        let wrapped = usize::try_from(index.rem_euclid(12)).unwrap_or_default();
        Self::ALL.get(wrapped).copied().unwrap_or(Self::Ty)
    }

    /// Vietnamese name with diacritics.
    #[must_use]
    pub const fn vietnamese_name(self) -> &'static str {
        match self {
            Self::Ty => "Tý",
            Self::Suu => "Sửu",
            Self::Dan => "Dần",
            Self::Mao => "Mão",
            Self::Thin => "Thìn",
            Self::Ti => "Tỵ",
            Self::Ngo => "Ngọ",
            Self::Mui => "Mùi",
            Self::Than => "Thân",
            Self::Dau => "Dậu",
            Self::Tuat => "Tuất",
            Self::Hoi => "Hợi",
        }
    }
}

impl fmt::Display for DayBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vietnamese_name())
    }
}

/// Read-only lunar snapshot of a local timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarMoment {
    /// Earthly branch of the day.
    pub day_branch: DayBranch,
    /// Index of the two-hour branch, `0..=11` with 0 for Tý (23:00 to 00:59).
    pub hour_branch_index: u8,
}

/// Convert a civil timestamp into its lunar moment.
///
/// The timestamp is already expressed in the target civil timezone (UTC+7);
/// implementations must read its calendar fields as-is.
pub trait LunarCalendar: Send + Sync {
    /// Return the lunar moment for `local`.
    fn lunar_moment(&self, local: NaiveDateTime) -> LunarMoment;
}

/// Arithmetic lunar calendar based on the sexagenary day cycle.
///
/// Day branches change at local midnight and hour branches span two hours,
/// with Tý straddling midnight.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use luckymap_core::{DayBranch, LunarCalendar, SexagenaryCalendar};
///
/// let local = NaiveDate::from_ymd_opt(2000, 1, 1)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .expect("valid timestamp");
/// let moment = SexagenaryCalendar.lunar_moment(local);
/// assert_eq!(moment.day_branch, DayBranch::Ngo);
/// assert_eq!(moment.hour_branch_index, 6);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SexagenaryCalendar;

impl SexagenaryCalendar {
    /// Julian Day Number of the civil date of `local`.
    #[must_use]
    pub fn julian_day_number(local: NaiveDateTime) -> i64 {
        i64::from(local.date().num_days_from_ce()) + JDN_FROM_CE_OFFSET
    }

    /// Two-hour branch index for an hour of the day.
    #[must_use]
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        clippy::cast_possible_truncation,
        reason = "hour branches are two-hour buckets shifted by one hour; the index is below 12"
    )]
    pub const fn hour_branch_index(hour: u32) -> u8 {
        let index = ((hour + 1) / 2) % 12;
        index as u8
    }
}

impl LunarCalendar for SexagenaryCalendar {
    fn lunar_moment(&self, local: NaiveDateTime) -> LunarMoment {
        let cycle = Self::julian_day_number(local) + SEXAGENARY_DAY_OFFSET;
        LunarMoment {
            day_branch: DayBranch::from_cycle_index(cycle),
            hour_branch_index: Self::hour_branch_index(local.hour()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid test timestamp")
    }

    #[rstest]
    fn julian_day_number_matches_j2000() {
        assert_eq!(
            SexagenaryCalendar::julian_day_number(at(2000, 1, 1, 0, 0)),
            2_451_545
        );
    }

    #[rstest]
    #[case(23, 0)]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(8, 4)]
    #[case(11, 6)]
    #[case(12, 6)]
    #[case(21, 11)]
    #[case(22, 11)]
    fn hour_branches_span_two_hours(#[case] hour: u32, #[case] expected: u8) {
        assert_eq!(SexagenaryCalendar::hour_branch_index(hour), expected);
    }

    #[rstest]
    fn consecutive_days_advance_one_branch() {
        let today = SexagenaryCalendar.lunar_moment(at(2024, 6, 15, 8, 30));
        let tomorrow = SexagenaryCalendar.lunar_moment(at(2024, 6, 16, 8, 30));
        let today_index = DayBranch::ALL
            .iter()
            .position(|b| *b == today.day_branch)
            .expect("branch listed");
        assert_eq!(
            tomorrow.day_branch,
            DayBranch::from_cycle_index(i64::try_from(today_index).expect("small") + 1)
        );
    }

    #[rstest]
    fn branch_repeats_every_twelve_days() {
        let first = SexagenaryCalendar.lunar_moment(at(2024, 1, 1, 10, 0));
        let later = SexagenaryCalendar.lunar_moment(at(2024, 1, 13, 10, 0));
        assert_eq!(first.day_branch, later.day_branch);
    }

    #[rstest]
    fn day_branch_changes_at_midnight() {
        let before = SexagenaryCalendar.lunar_moment(at(2024, 6, 15, 23, 59));
        let after = SexagenaryCalendar.lunar_moment(at(2024, 6, 16, 0, 0));
        assert_ne!(before.day_branch, after.day_branch);
        assert_eq!(before.hour_branch_index, 0);
        assert_eq!(after.hour_branch_index, 0);
    }
}
