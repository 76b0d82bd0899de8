// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Parse-and-normalize boundary.
//!
//! Loosely typed input (longitudes that may be radians, dates in several
//! textual shapes, stem/branch text in Hangul or Hanja) is coerced here into
//! typed values or rejected. The algorithms behind this module only see
//! already-validated values.

use crate::cycle::{Branch, GanZhi, Stem};
use crate::error::{Error, Result};
use crate::fmt::{BRANCH_HANGUL, BRANCH_HANJA, STEM_HANGUL, STEM_HANJA};
use chrono::{Datelike, NaiveDate, NaiveTime};
use std::f64::consts::PI;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A geographic longitude in degrees east, normalized to `[-180, 180]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Longitude(f64);

impl Longitude {
    /// Seoul, the conventional reference longitude.
    pub const SEOUL: Longitude = Longitude(127.5);

    /// Normalize a longitude given in degrees or radians.
    ///
    /// Any magnitude `≤ π` is read as radians. Values outside `[-180, 180]`
    /// are wrapped, never rejected; only non-finite input fails.
    ///
    /// ```
    /// use ganji::Longitude;
    ///
    /// assert_eq!(Longitude::parse(127.5).unwrap().degrees(), 127.5);
    /// assert_eq!(Longitude::parse(190.0).unwrap().degrees(), -170.0);
    /// assert!((Longitude::parse(1.0).unwrap().degrees() - 57.29578).abs() < 1e-4);
    /// ```
    pub fn parse(raw: f64) -> Result<Self> {
        if !raw.is_finite() {
            return Err(Error::InvalidLongitude(raw));
        }
        let degrees = if raw.abs() <= PI { raw.to_degrees() } else { raw };
        Ok(Self::from_degrees(degrees))
    }

    /// Wrap a longitude already known to be in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        if (-180.0..=180.0).contains(&degrees) {
            return Longitude(degrees);
        }
        let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
        // Keep the eastern edge at +180 rather than folding it to −180.
        if wrapped == -180.0 && degrees > 0.0 {
            Longitude(180.0)
        } else {
            Longitude(wrapped)
        }
    }

    #[inline]
    pub const fn degrees(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Longitude {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Longitude> for f64 {
    fn from(value: Longitude) -> Self {
        value.0
    }
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%H%M"];

/// Parse a Gregorian date from `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD` or `YYYYMMDD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| Error::unparseable("date", input))
}

/// Parse a clock time from `HH:MM:SS`, `HH:MM` or `HHMM`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| Error::unparseable("time", input))
}

/// Year, month and day as written, before a calendar is applied.
///
/// Lunar dates such as the 30th of the 2nd month are valid here even though
/// they do not name a Gregorian day.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateFields {
    /// Check the ranges shared by both calendars (month 1–12, day 1–31).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Ok(Self { year, month, day })
        } else {
            Err(Error::invalid_date(year, month, day))
        }
    }

    /// Same shapes as [`parse_date`], without the Gregorian day check.
    ///
    /// ```
    /// use ganji::input::DateFields;
    ///
    /// let lunar = DateFields::parse("2023.02.30").unwrap();
    /// assert_eq!((lunar.month, lunar.day), (2, 30));
    /// assert!(lunar.solar().is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            vec![&trimmed[..4], &trimmed[4..6], &trimmed[6..]]
        } else {
            trimmed.split(['-', '/', '.']).collect()
        };
        let [year, month, day] = parts.as_slice() else {
            return Err(Error::unparseable("date", input));
        };
        let unparseable = |_| Error::unparseable("date", input);
        Self::new(
            year.parse().map_err(unparseable)?,
            month.parse().map_err(unparseable)?,
            day.parse().map_err(unparseable)?,
        )
    }

    /// Read the fields as a Gregorian date.
    pub fn solar(self) -> Result<NaiveDate> {
        date_from_fields(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateFields {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Validate numeric date fields.
pub fn date_from_fields(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::invalid_date(year, month, day))
}

/// Validate numeric clock fields.
pub fn time_from_fields(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(Error::InvalidTime {
        hour,
        minute,
        second: 0,
    })
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn lookup(c: char, tables: [&[char]; 2]) -> Option<usize> {
    tables
        .into_iter()
        .find_map(|table| table.iter().position(|&symbol| symbol == c))
}

impl FromStr for Stem {
    type Err = Error;

    /// Accepts one Hangul (`갑`) or Hanja (`甲`) character.
    fn from_str(s: &str) -> Result<Self> {
        single_char(s)
            .and_then(|c| lookup(c, [&STEM_HANGUL, &STEM_HANJA]))
            .map(|i| Stem::ALL[i])
            .ok_or_else(|| Error::unknown_symbol("stem", s))
    }
}

impl FromStr for Branch {
    type Err = Error;

    /// Accepts one Hangul (`자`) or Hanja (`子`) character.
    fn from_str(s: &str) -> Result<Self> {
        single_char(s)
            .and_then(|c| lookup(c, [&BRANCH_HANGUL, &BRANCH_HANJA]))
            .map(|i| Branch::ALL[i])
            .ok_or_else(|| Error::unknown_symbol("branch", s))
    }
}

impl FromStr for GanZhi {
    type Err = Error;

    /// Accepts a two-character pair in either script, e.g. `갑자` or `甲子`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(Error::unknown_symbol("sexagenary pair", s));
        };
        let stem: Stem = stem.to_string().parse()?;
        let branch: Branch = branch.to_string().parse()?;
        GanZhi::from_parts(stem, branch)
    }
}
