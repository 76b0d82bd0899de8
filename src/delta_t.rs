// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T) — UT↔TT correction
//!
//! Polynomial expressions of Espenak & Meeus (NASA, 2006) for the years the
//! sexagenary engine is used with (1800–2150), with the long-term parabola
//! of Morrison & Stephenson (2004) outside that window. The correction only
//! moves solar terms by about a minute, so per-segment accuracy of a few
//! seconds is sufficient.
//!
//! Applied automatically by the [`UT`](super::UT) scale.

use qtty::{Days, Seconds};

/// JD of 2000-01-01T00:00 on the UT axis.
const JD_YEAR_2000: f64 = 2_451_544.5;

/// Mean Gregorian year in days.
const YEAR_DAYS: f64 = 365.2425;

/// Decimal year for a JD on the UT axis.
#[inline]
fn decimal_year(jd_ut: Days) -> f64 {
    2000.0 + (jd_ut.value() - JD_YEAR_2000) / YEAR_DAYS
}

/// **Outside 1800–2150**: long-term parabola.
#[inline]
fn delta_t_long_term(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// **1800–1860**
fn delta_t_1800(y: f64) -> f64 {
    let t = y - 1800.0;
    13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3) - 0.00037436 * t.powi(4)
        + 0.0000121272 * t.powi(5)
        - 0.0000001699 * t.powi(6)
        + 0.000000000875 * t.powi(7)
}

/// **1860–1900**
fn delta_t_1860(y: f64) -> f64 {
    let t = y - 1860.0;
    7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3) - 0.0004473624 * t.powi(4)
        + t.powi(5) / 233_174.0
}

/// **1900–1920**
fn delta_t_1900(y: f64) -> f64 {
    let t = y - 1900.0;
    -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
}

/// **1920–1941**
fn delta_t_1920(y: f64) -> f64 {
    let t = y - 1920.0;
    21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
}

/// **1941–1961**
fn delta_t_1941(y: f64) -> f64 {
    let t = y - 1950.0;
    29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
}

/// **1961–1986**
fn delta_t_1961(y: f64) -> f64 {
    let t = y - 1975.0;
    45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
}

/// **1986–2005**
fn delta_t_1986(y: f64) -> f64 {
    let t = y - 2000.0;
    63.86 + 0.3345 * t - 0.060374 * t.powi(2)
        + 0.0017275 * t.powi(3)
        + 0.000651814 * t.powi(4)
        + 0.00002373599 * t.powi(5)
}

/// **2005–2050**
fn delta_t_2005(y: f64) -> f64 {
    let t = y - 2000.0;
    62.92 + 0.32217 * t + 0.005589 * t.powi(2)
}

/// **2050–2150**
fn delta_t_2050(y: f64) -> f64 {
    delta_t_long_term(y) - 0.5628 * (2150.0 - y)
}

/// Returns **ΔT** for a Julian Day on the **UT** axis.
pub(crate) fn delta_t_seconds(jd_ut: Days) -> Seconds {
    let y = decimal_year(jd_ut);
    let dt = match y {
        y if y < 1800.0 => delta_t_long_term(y),
        y if y < 1860.0 => delta_t_1800(y),
        y if y < 1900.0 => delta_t_1860(y),
        y if y < 1920.0 => delta_t_1900(y),
        y if y < 1941.0 => delta_t_1920(y),
        y if y < 1961.0 => delta_t_1941(y),
        y if y < 1986.0 => delta_t_1961(y),
        y if y < 2005.0 => delta_t_1986(y),
        y if y < 2050.0 => delta_t_2005(y),
        y if y < 2150.0 => delta_t_2050(y),
        y => delta_t_long_term(y),
    };
    Seconds::new(dt)
}
