// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine configuration.
//!
//! Every field has a default matching the conventional Korean usage
//! (Seoul longitude, split-midnight rule, twelve decades). With the `serde`
//! feature the structs deserialize from partial documents; missing fields
//! take their defaults.

use crate::day_boundary::DayBoundaryRule;
use chrono::TimeDelta;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of the solar-term root search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Mean solar motion used for the first guess, degrees per day.
    pub mean_rate_deg_per_day: f64,
    /// Half-width of the initial bracket, days.
    pub half_window_days: f64,
    /// Maximum number of ±1 day bracket expansions.
    pub max_expansions: u32,
    /// Maximum number of bisection steps.
    pub max_iterations: u32,
    /// Residual at which bisection stops, degrees.
    pub tolerance_deg: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mean_rate_deg_per_day: 0.9856,
            half_window_days: 3.0,
            max_expansions: 10,
            max_iterations: 60,
            tolerance_deg: 1e-8,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Rule used when a birth record does not name one.
    pub day_boundary: DayBoundaryRule,
    /// Longitude (degrees east) used for term sampling when the location is unknown.
    pub default_longitude: f64,
    /// Offset added after each month-opening term, minutes.
    pub month_boundary_offset_minutes: i64,
    /// Number of decades produced when the caller does not ask for a count.
    pub luck_cycle_count: u32,
    /// Root-search parameters.
    pub search: SearchConfig,
}

impl EngineConfig {
    /// The month boundary offset as a chrono duration.
    #[inline]
    pub fn month_boundary_offset(&self) -> TimeDelta {
        TimeDelta::minutes(self.month_boundary_offset_minutes)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            day_boundary: DayBoundaryRule::default(),
            default_longitude: 127.5,
            month_boundary_offset_minutes: 30,
            luck_cycle_count: 12,
            search: SearchConfig::default(),
        }
    }
}
