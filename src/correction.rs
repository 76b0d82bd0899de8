// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock → apparent local solar time.
//!
//! ```text
//! corrected = wall + 4·(λ − λ_std) min + EoT(doy, UTC hour) min
//! ```
//!
//! `λ_std` is the standard meridian of the civil zone, looked up in
//! [`MERIDIAN_TABLE`] and otherwise rounded to the nearest 15°. The
//! equation of time is the NOAA harmonic fit, evaluated at the UTC instant
//! implied by that meridian, so it does not depend on any zone database.
//!
//! An unknown location skips the correction and returns the wall-clock
//! value unchanged.

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use std::f64::consts::TAU;

use crate::error::{Error, Result};
use crate::input::Longitude;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A longitude range that keeps a civil meridian other than the nearest 15°.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeridianRegion {
    pub name: &'static str,
    /// Western edge, degrees east, inclusive.
    pub west: f64,
    /// Eastern edge, degrees east, inclusive.
    pub east: f64,
    /// Standard meridian, degrees east.
    pub meridian: f64,
}

/// Ordered region table; the first matching range wins.
pub const MERIDIAN_TABLE: &[MeridianRegion] = &[
    MeridianRegion {
        name: "Korea",
        west: 124.0,
        east: 132.0,
        meridian: 135.0,
    },
    MeridianRegion {
        name: "Japan",
        west: 128.0,
        east: 146.0,
        meridian: 135.0,
    },
    MeridianRegion {
        name: "China",
        west: 73.0,
        east: 135.0,
        meridian: 120.0,
    },
    MeridianRegion {
        name: "US Eastern",
        west: -87.5,
        east: -67.0,
        meridian: -75.0,
    },
    MeridianRegion {
        name: "US Central",
        west: -101.5,
        east: -87.5,
        meridian: -90.0,
    },
    MeridianRegion {
        name: "US Mountain",
        west: -114.0,
        east: -101.5,
        meridian: -105.0,
    },
    MeridianRegion {
        name: "US Pacific",
        west: -125.0,
        east: -114.0,
        meridian: -120.0,
    },
];

/// Standard meridian for `longitude`, degrees east.
///
/// ```
/// use ganji::{correction, Longitude};
///
/// assert_eq!(correction::standard_meridian(Longitude::SEOUL), 135.0);
/// assert_eq!(correction::standard_meridian(Longitude::from_degrees(2.35)), 0.0);
/// ```
pub fn standard_meridian(longitude: Longitude) -> f64 {
    let lon = longitude.degrees();
    MERIDIAN_TABLE
        .iter()
        .find(|region| (region.west..=region.east).contains(&lon))
        .map(|region| region.meridian)
        .unwrap_or_else(|| (lon / 15.0).round() * 15.0)
}

/// Offset of the civil zone from UTC implied by the standard meridian.
pub fn utc_offset(longitude: Longitude) -> TimeDelta {
    TimeDelta::minutes((standard_meridian(longitude) * 4.0).round() as i64)
}

/// Equation of time in minutes (apparent − mean solar time) at a UTC instant.
pub fn equation_of_time_minutes(utc: NaiveDateTime) -> f64 {
    let hour = f64::from(utc.hour())
        + f64::from(utc.minute()) / 60.0
        + f64::from(utc.second()) / 3_600.0;
    let gamma = TAU / 365.0 * (f64::from(utc.ordinal()) - 1.0 + (hour - 12.0) / 24.0);
    229.18
        * (0.000_075 + 0.001_868 * gamma.cos()
            - 0.032_077 * gamma.sin()
            - 0.014_615 * (2.0 * gamma).cos()
            - 0.040_849 * (2.0 * gamma).sin())
}

/// Breakdown of a correction.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeCorrection {
    /// Wall-clock input.
    pub raw: NaiveDateTime,
    /// Apparent local time.
    pub corrected: NaiveDateTime,
    /// Standard meridian used, degrees east.
    pub standard_meridian: f64,
    /// `4·(λ − λ_std)`, minutes.
    pub longitude_minutes: f64,
    /// Equation of time, minutes.
    pub equation_minutes: f64,
}

impl TimeCorrection {
    /// Apply the correction for a known location.
    ///
    /// Fails with [`Error::OutOfRange`] when the shift leaves chrono's
    /// representable range.
    pub fn compute(raw: NaiveDateTime, longitude: Longitude) -> Result<Self> {
        let out_of_range = Error::OutOfRange(raw.year());
        let meridian = standard_meridian(longitude);
        let longitude_minutes = 4.0 * (longitude.degrees() - meridian);
        let utc = raw
            .checked_sub_signed(utc_offset(longitude))
            .ok_or_else(|| out_of_range.clone())?;
        let equation_minutes = equation_of_time_minutes(utc);
        let shift_ms = ((longitude_minutes + equation_minutes) * 60_000.0).round() as i64;
        let corrected = raw
            .checked_add_signed(TimeDelta::milliseconds(shift_ms))
            .ok_or(out_of_range)?;
        tracing::trace!(%raw, %corrected, meridian, longitude_minutes, equation_minutes, "time corrected");
        Ok(Self {
            raw,
            corrected,
            standard_meridian: meridian,
            longitude_minutes,
            equation_minutes,
        })
    }

    /// The identity correction used when the location is unknown.
    pub fn identity(raw: NaiveDateTime) -> Self {
        Self {
            raw,
            corrected: raw,
            standard_meridian: 0.0,
            longitude_minutes: 0.0,
            equation_minutes: 0.0,
        }
    }

    /// Total shift, minutes.
    pub fn total_minutes(&self) -> f64 {
        self.longitude_minutes + self.equation_minutes
    }
}

/// Corrected instant for a raw wall-clock value.
///
/// `longitude` may be degrees or radians (see [`Longitude::parse`]). When
/// `location_known` is false the raw value is returned untouched.
pub fn corrected_instant(
    raw: NaiveDateTime,
    longitude: f64,
    location_known: bool,
) -> Result<NaiveDateTime> {
    if !location_known {
        return Ok(raw);
    }
    let longitude = Longitude::parse(longitude)?;
    Ok(TimeCorrection::compute(raw, longitude)?.corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn regional_meridians() {
        let cases = [
            (126.98, 135.0),
            (139.69, 135.0),
            (116.4, 120.0),
            (87.6, 120.0),
            (-74.0, -75.0),
            (-87.6, -90.0),
            (-104.99, -105.0),
            (-118.24, -120.0),
            (2.35, 0.0),
            (77.2, 120.0),
            (-43.2, -45.0),
            (151.2, 150.0),
        ];
        for (lon, meridian) in cases {
            assert_eq!(
                standard_meridian(Longitude::from_degrees(lon)),
                meridian,
                "{lon}"
            );
        }
    }

    #[test]
    fn equation_of_time_seasonal_extremes() {
        // Early November ≈ +16.4 min, mid February ≈ −14.2 min.
        let nov = equation_of_time_minutes(wall(2024, 11, 3, 12, 0));
        let feb = equation_of_time_minutes(wall(2024, 2, 11, 12, 0));
        assert!((nov - 16.4).abs() < 0.6, "{nov}");
        assert!((feb + 14.2).abs() < 0.6, "{feb}");
    }

    #[test]
    fn seoul_scenario_is_reproducible() {
        let raw = wall(1996, 12, 29, 16, 3);
        let first = TimeCorrection::compute(raw, Longitude::SEOUL).unwrap();
        assert_eq!(first.standard_meridian, 135.0);
        assert_eq!(first.longitude_minutes, -30.0);
        assert!((first.equation_minutes + 1.905).abs() < 0.01);
        let expected = wall(1996, 12, 29, 15, 31) + TimeDelta::milliseconds(5_684);
        assert!((first.corrected - expected).num_milliseconds().abs() <= 1);
        for _ in 0..10 {
            assert_eq!(TimeCorrection::compute(raw, Longitude::SEOUL).unwrap(), first);
        }
    }

    #[test]
    fn unknown_location_is_identity() {
        let raw = wall(1996, 12, 29, 16, 3);
        assert_eq!(corrected_instant(raw, f64::NAN, false), Ok(raw));
        assert_eq!(TimeCorrection::identity(raw).corrected, raw);
        assert_eq!(TimeCorrection::identity(raw).total_minutes(), 0.0);
    }

    #[test]
    fn radians_are_accepted() {
        let raw = wall(1996, 12, 29, 16, 3);
        let by_degrees = corrected_instant(raw, 127.5, true).unwrap();
        let by_radians = corrected_instant(raw, 127.5_f64.to_radians(), true).unwrap();
        assert!((by_degrees - by_radians).num_milliseconds().abs() <= 1);
        assert!(corrected_instant(raw, f64::INFINITY, true).is_err());
    }

    #[test]
    fn shifts_past_the_calendar_edges_are_errors() {
        // 142.5°E is 30 min ahead of its meridian, Seoul 30 min behind.
        let last = NaiveDate::MAX.and_hms_opt(23, 50, 0).unwrap();
        assert_eq!(
            TimeCorrection::compute(last, Longitude::from_degrees(142.5)),
            Err(Error::OutOfRange(NaiveDate::MAX.year()))
        );
        let first = NaiveDate::MIN.and_hms_opt(0, 10, 0).unwrap();
        assert_eq!(
            corrected_instant(first, 127.5, true),
            Err(Error::OutOfRange(NaiveDate::MIN.year()))
        );
    }
}
