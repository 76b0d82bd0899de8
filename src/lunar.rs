// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunar → solar date conversion.
//!
//! The historical lunisolar table is not part of this crate. Callers plug
//! one in through [`LunarCalendar`]; [`MonthTable`] is an in-memory
//! implementation fed with month-start rows.
//!
//! A failed conversion never aborts a chart: [`resolve_solar_date`] falls
//! back to reading the fields as a Gregorian date and reports a
//! [`Warning::LunarFallback`].

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta};
use tracing::warn;

use crate::error::{Error, Result, Warning};
use crate::input::date_from_fields;

/// Longest lunar month.
const MAX_LUNAR_DAY: u32 = 30;

/// A lunar-to-solar lookup.
pub trait LunarCalendar {
    /// Gregorian date of lunar `year`/`month`/`day`; `is_leap` selects the
    /// intercalary month.
    fn lunar_to_solar(&self, year: i32, month: u32, day: u32, is_leap: bool) -> Result<NaiveDate>;
}

/// Lunar month table: the Gregorian date of day 1 and the month length.
#[derive(Debug, Clone, Default)]
pub struct MonthTable {
    months: HashMap<(i32, u32, bool), (NaiveDate, u32)>,
}

impl MonthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a month starting on `first_day` and lasting `length` days.
    pub fn insert(&mut self, year: i32, month: u32, is_leap: bool, first_day: NaiveDate, length: u32) {
        self.months
            .insert((year, month, is_leap), (first_day, length.min(MAX_LUNAR_DAY)));
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl LunarCalendar for MonthTable {
    fn lunar_to_solar(&self, year: i32, month: u32, day: u32, is_leap: bool) -> Result<NaiveDate> {
        let unavailable = Error::ConversionUnavailable {
            year,
            month,
            day,
            leap: is_leap,
        };
        let &(first, length) = self
            .months
            .get(&(year, month, is_leap))
            .ok_or_else(|| unavailable.clone())?;
        if day == 0 || day > length {
            return Err(unavailable);
        }
        first
            .checked_add_signed(TimeDelta::days(i64::from(day) - 1))
            .ok_or(unavailable)
    }
}

/// Convert a lunar birth date, falling back to the unconverted fields.
///
/// Returns the solar date and, when the fallback was taken, the warning to
/// attach to the chart. Fails only when the fallback fields are not a valid
/// Gregorian date either.
pub fn resolve_solar_date(
    calendar: Option<&dyn LunarCalendar>,
    year: i32,
    month: u32,
    day: u32,
    is_leap: bool,
) -> Result<(NaiveDate, Option<Warning>)> {
    let failure = match calendar {
        Some(calendar) => match calendar.lunar_to_solar(year, month, day, is_leap) {
            Ok(date) => return Ok((date, None)),
            Err(err) => err,
        },
        None => Error::ConversionUnavailable {
            year,
            month,
            day,
            leap: is_leap,
        },
    };
    warn!(year, month, day, is_leap, error = %failure, "lunar conversion failed; using the date as solar");
    let date = date_from_fields(year, month, day)?;
    Ok((date, Some(Warning::LunarFallback(failure))))
}
