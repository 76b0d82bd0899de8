// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Where the calendrical day changes.
//!
//! | Rule | 23:00–24:00 | 00:00–01:00 | 01:00–03:00 |
//! |------|-------------|-------------|-------------|
//! | `자시` | next day | current day | current day |
//! | `조자시/야자시` | next day (야자시) | current day (조자시) | current day |
//! | `인시` | current day | previous day | previous day |
//!
//! Under `인시` the whole 23:00–03:00 window belongs to the day that started
//! at the previous 03:00, so its hour stems take the two-stem shift of
//! [`GanZhi::for_hour`](crate::GanZhi::for_hour).

use crate::cycle::Branch;
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const LATE_NIGHT_START: u32 = 23;
const TIGER_HOUR_START: u32 = 3;

/// Civil convention for the start of the day.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DayBoundaryRule {
    /// `"자시"`: the day turns at 23:00.
    #[cfg_attr(feature = "serde", serde(rename = "자시"))]
    Midnight,
    /// `"조자시/야자시"`: the Ja hour is split at midnight.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "조자시/야자시"))]
    SplitMidnight,
    /// `"인시"`: the day turns at 03:00.
    #[cfg_attr(feature = "serde", serde(rename = "인시"))]
    TigerHour,
}

impl DayBoundaryRule {
    pub const ALL: [DayBoundaryRule; 3] = [
        DayBoundaryRule::Midnight,
        DayBoundaryRule::SplitMidnight,
        DayBoundaryRule::TigerHour,
    ];

    /// The exact label used by stored birth records.
    pub const fn label(self) -> &'static str {
        match self {
            DayBoundaryRule::Midnight => "자시",
            DayBoundaryRule::SplitMidnight => "조자시/야자시",
            DayBoundaryRule::TigerHour => "인시",
        }
    }
}

impl fmt::Display for DayBoundaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DayBoundaryRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.label() == s.trim())
            .ok_or_else(|| Error::unknown_symbol("day boundary rule", s))
    }
}

/// Which half of a split Ja hour an instant falls in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NightHalf {
    /// 00:00–01:00 (조자시).
    Early,
    /// 23:00–24:00 (야자시).
    Late,
}

/// Everything the pillar calculator needs to know about a clock time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HourResolution {
    /// Hour branch from the clock window table.
    pub branch: Branch,
    /// Days to add to the civil date before taking the day pillar.
    pub day_offset: i64,
    /// Whether the hour stem takes the two-stem shift.
    pub shifted: bool,
    /// Set for Ja hours under the split rule.
    pub night_half: Option<NightHalf>,
}

/// Day offset (−1, 0 or +1) for `instant` under `rule`.
///
/// ```
/// use chrono::NaiveDate;
/// use ganji::{day_boundary, DayBoundaryRule};
///
/// let late = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(23, 30, 0).unwrap();
/// assert_eq!(day_boundary::day_offset(&late, DayBoundaryRule::Midnight), 1);
/// assert_eq!(day_boundary::day_offset(&late, DayBoundaryRule::TigerHour), 0);
/// ```
pub fn day_offset(instant: &NaiveDateTime, rule: DayBoundaryRule) -> i64 {
    let hour = instant.hour();
    match rule {
        DayBoundaryRule::Midnight | DayBoundaryRule::SplitMidnight => {
            i64::from(hour >= LATE_NIGHT_START)
        }
        DayBoundaryRule::TigerHour => -i64::from(hour < TIGER_HOUR_START),
    }
}

/// Civil date whose day pillar applies to `instant`.
pub fn effective_date(instant: &NaiveDateTime, rule: DayBoundaryRule) -> Result<NaiveDate> {
    instant
        .date()
        .checked_add_signed(TimeDelta::days(day_offset(instant, rule)))
        .ok_or(Error::OutOfRange(instant.year()))
}

/// Resolve the hour branch, day offset and stem shift for `instant`.
pub fn resolve(instant: &NaiveDateTime, rule: DayBoundaryRule) -> HourResolution {
    let hour = instant.hour();
    let branch = Branch::from_clock(hour * 60 + instant.minute());
    let shifted = rule == DayBoundaryRule::TigerHour
        && (hour >= LATE_NIGHT_START || hour < TIGER_HOUR_START);
    let night_half = match (rule, branch) {
        (DayBoundaryRule::SplitMidnight, Branch::Ja) if hour >= LATE_NIGHT_START => {
            Some(NightHalf::Late)
        }
        (DayBoundaryRule::SplitMidnight, Branch::Ja) => Some(NightHalf::Early),
        _ => None,
    };
    let resolution = HourResolution {
        branch,
        day_offset: day_offset(instant, rule),
        shifted,
        night_half,
    };
    tracing::trace!(%instant, %rule, ?resolution, "resolved day boundary");
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn labels_round_trip() {
        for rule in DayBoundaryRule::ALL {
            assert_eq!(rule.label().parse::<DayBoundaryRule>(), Ok(rule));
            assert_eq!(rule.to_string(), rule.label());
        }
        assert!(matches!(
            "야자시".parse::<DayBoundaryRule>(),
            Err(Error::UnknownSymbol { .. })
        ));
        assert_eq!(DayBoundaryRule::default(), DayBoundaryRule::SplitMidnight);
    }

    #[test]
    fn offsets_per_rule() {
        use DayBoundaryRule::*;
        let table = [
            ((22, 59), [0, 0, 0]),
            ((23, 0), [1, 1, 0]),
            ((23, 59), [1, 1, 0]),
            ((0, 0), [0, 0, -1]),
            ((0, 59), [0, 0, -1]),
            ((2, 59), [0, 0, -1]),
            ((3, 0), [0, 0, 0]),
            ((12, 0), [0, 0, 0]),
        ];
        for ((h, m), expected) in table {
            let got = [Midnight, SplitMidnight, TigerHour].map(|r| day_offset(&at(h, m), r));
            assert_eq!(got, expected, "{h:02}:{m:02}");
        }
    }

    #[test]
    fn effective_date_crosses_month_ends() {
        let late = NaiveDate::from_ymd_opt(2024, 4, 30)
            .unwrap()
            .and_hms_opt(23, 10, 0)
            .unwrap();
        assert_eq!(
            effective_date(&late, DayBoundaryRule::Midnight),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        let early = at(1, 0);
        assert_eq!(
            effective_date(&early, DayBoundaryRule::TigerHour),
            Ok(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap())
        );
    }

    #[test]
    fn effective_date_at_the_calendar_edges_is_an_error() {
        let last = NaiveDate::MAX.and_hms_opt(23, 30, 0).unwrap();
        assert_eq!(
            effective_date(&last, DayBoundaryRule::Midnight),
            Err(Error::OutOfRange(NaiveDate::MAX.year()))
        );
        let first = NaiveDate::MIN.and_hms_opt(1, 0, 0).unwrap();
        assert_eq!(
            effective_date(&first, DayBoundaryRule::TigerHour),
            Err(Error::OutOfRange(NaiveDate::MIN.year()))
        );
        assert_eq!(
            effective_date(&last, DayBoundaryRule::TigerHour),
            Ok(NaiveDate::MAX)
        );
    }

    #[test]
    fn split_rule_reports_halves() {
        let rule = DayBoundaryRule::SplitMidnight;
        assert_eq!(resolve(&at(23, 30), rule).night_half, Some(NightHalf::Late));
        assert_eq!(resolve(&at(0, 30), rule).night_half, Some(NightHalf::Early));
        assert_eq!(resolve(&at(1, 30), rule).night_half, None);
        assert_eq!(resolve(&at(23, 30), DayBoundaryRule::Midnight).night_half, None);
    }

    #[test]
    fn only_tiger_rule_shifts_night_stems() {
        for (h, shifted) in [(22, false), (23, true), (0, true), (2, true), (3, false)] {
            assert_eq!(resolve(&at(h, 15), DayBoundaryRule::TigerHour).shifted, shifted);
            assert!(!resolve(&at(h, 15), DayBoundaryRule::SplitMidnight).shifted);
        }
    }
}
