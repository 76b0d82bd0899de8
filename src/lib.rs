// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sexagenary (GanZhi) calendar and luck-cycle engine.
//!
//! This crate computes the four pillars (사주) of a birth moment and the
//! luck periods derived from them.
//!
//! # Core types
//!
//! - [`GanZhi`] — one of the 60 stem-branch pairs, with [`Stem`] and [`Branch`].
//! - [`Pillars4`] — year, month, day and optional hour pillars.
//! - [`Engine`] — configuration plus the solar-term cache; produces [`Chart`]s.
//! - [`SolarTermLocator`] — bracketed bisection for the 24 solar terms.
//! - [`LuckCycleBuilder`] — decades, years, months and days as [`LuckEvent`]s.
//! - [`Time<S>`] — a point on a [`TimeScale`]; [`JulianDate`] is `Time<JD>`.
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | lunar → solar date | [`lunar`] |
//! | wall clock → apparent local time | [`correction`] |
//! | solar longitude, solar terms | [`solar`], [`solar_term`] |
//! | day boundary, hour branch | [`day_boundary`] |
//! | pillars | [`pillars`], [`cycle`] |
//! | luck cycles | [`luck`] |
//!
//! # ΔT (Delta T)
//!
//! Civil instants are Universal Time while the solar series runs on TT.
//! The [`UT`] scale applies **ΔT = TT − UT** on the way in and removes it on
//! the way out, so `JulianDate::from_utc` and `to_utc` handle it implicitly.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use ganji::{BirthInput, Engine, Gender};
//!
//! let engine = Engine::default();
//! let input = BirthInput::new(NaiveDate::from_ymd_opt(1996, 12, 29).unwrap(), Gender::Male)
//!     .with_time(NaiveTime::from_hms_opt(16, 3, 0).unwrap())
//!     .with_location(127.5);
//! let chart = engine.chart(&input, None).unwrap();
//!
//! assert_eq!(chart.pillars.year.to_string(), "丙子");
//! assert_eq!(chart.pillars.hour.unwrap().to_string(), "甲申");
//! ```

mod delta_t;
pub(crate) mod instant;
mod julian_date_ext;
mod period;
pub(crate) mod scales;

pub mod chart;
pub mod config;
pub mod correction;
pub mod cycle;
pub mod day_boundary;
pub mod error;
pub mod fmt;
pub mod input;
pub mod luck;
pub mod lunar;
pub mod pillars;
pub mod solar;
pub mod solar_term;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use instant::{Time, TimeInstant, TimeScale};
pub use julian_date_ext::{date_of_jdn, jdn_of};
pub use period::{Interval, WallPeriod};
pub use scales::{JD, UT};

pub use chart::{BirthInput, CalendarKind, Chart, Engine};
pub use config::{EngineConfig, SearchConfig};
pub use correction::TimeCorrection;
pub use cycle::{Branch, Element, GanZhi, Polarity, Stem};
pub use day_boundary::DayBoundaryRule;
pub use error::{Error, Result, Warning};
pub use input::Longitude;
pub use luck::{Direction, Gender, LuckCycleBuilder, LuckEvent, LuckScale};
pub use lunar::LunarCalendar;
pub use pillars::{PillarCalculator, Pillars4};
pub use solar_term::{SolarTerm, SolarTermLocator, TermInstant};

/// Julian Date on the TT axis.
///
/// This is a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;
