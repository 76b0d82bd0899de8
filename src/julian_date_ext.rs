// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date (`Time<JD>`) extensions and the civil-date bridge.

use chrono::{Datelike, NaiveDate};
use qtty::*;

use super::instant::Time;
use super::scales::JD;

/// Offset between chrono's day count from 0001-01-01 (day 1) and the JDN.
const JDN_OF_CE_DAY_ZERO: i64 = 1_721_425;

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT  (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0, the time argument of the solar series.
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        Centuries::new(
            ((*self - Self::J2000) / Self::JULIAN_CENTURY)
                .simplify()
                .value(),
        )
    }
}

/// Julian Day Number of a proleptic Gregorian date (the day that begins at
/// the preceding noon in the astronomical convention).
///
/// ```
/// use chrono::NaiveDate;
/// use ganji::jdn_of;
///
/// let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
/// assert_eq!(jdn_of(date), 2_451_545);
/// ```
#[inline]
pub fn jdn_of(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JDN_OF_CE_DAY_ZERO
}

/// Inverse of [`jdn_of`]. Returns `None` outside chrono's date range.
pub fn date_of_jdn(jdn: i64) -> Option<NaiveDate> {
    let days = i32::try_from(jdn - JDN_OF_CE_DAY_ZERO).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}
