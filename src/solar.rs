// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent ecliptic longitude of the Sun.
//!
//! Low-precision solar theory (Meeus, *Astronomical Algorithms*, ch. 25):
//! mean longitude and mean anomaly as polynomials in Julian centuries, the
//! equation of centre, then aberration and the dominant nutation term.
//! Good to about 0.01°, i.e. a quarter of an hour in solar-term timing.

use crate::JulianDate;

/// Aberration correction, degrees.
const ABERRATION_DEG: f64 = 0.00569;

/// Amplitude of the nutation term in the node longitude, degrees.
const NUTATION_DEG: f64 = 0.00478;

/// Wrap any finite angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Apparent geocentric ecliptic longitude of the Sun in degrees, `[0, 360)`.
///
/// ```
/// use ganji::{solar, JulianDate};
///
/// // Near the March equinox of 2000 the longitude is close to 0°.
/// let lon = solar::apparent_longitude(JulianDate::new(2_451_623.8));
/// assert!(lon < 0.5 || lon > 359.5);
/// ```
pub fn apparent_longitude(jd: JulianDate) -> f64 {
    let t = jd.julian_centuries().value();

    let mean_longitude = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
    let mean_anomaly = (357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t).to_radians();

    let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * mean_anomaly.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * mean_anomaly).sin()
        + 0.000_289 * (3.0 * mean_anomaly).sin();

    let node = (125.04 - 1_934.136 * t).to_radians();
    let apparent = mean_longitude + center - ABERRATION_DEG - NUTATION_DEG * node.sin();

    normalize_degrees(apparent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_example_25a() {
        // 1992 October 13.0 TD: apparent λ = 199.90895° (Meeus example 25.a).
        let lon = apparent_longitude(JulianDate::new(2_448_908.5));
        assert!((lon - 199.908_95).abs() < 2e-3, "λ = {lon}");
    }

    #[test]
    fn always_in_range() {
        for k in 0..2_000 {
            let jd = JulianDate::new(2_415_020.0 + f64::from(k) * 37.3);
            let lon = apparent_longitude(jd);
            assert!((0.0..360.0).contains(&lon));
        }
    }

    #[test]
    fn advances_about_one_degree_per_day() {
        let jd = JulianDate::new(2_460_000.5);
        let today = apparent_longitude(jd);
        let tomorrow = apparent_longitude(jd + qtty::Days::new(1.0));
        let rate = normalize_degrees(tomorrow - today);
        assert!((0.95..1.02).contains(&rate), "rate = {rate}");
    }

    #[test]
    fn normalize_wraps_both_ways() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
    }
}
