// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open time intervals.
//!
//! Month spans between solar-term boundaries and the spans of luck events
//! are both [`Interval`]s over wall-clock [`NaiveDateTime`] values.

use super::TimeInstant;
use chrono::NaiveDateTime;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval `[start, end)` between two instants.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ganji::Interval;
///
/// let day = NaiveDate::from_ymd_opt(2024, 2, 4).unwrap();
/// let span = Interval::new(day.and_hms_opt(0, 0, 0).unwrap(), day.and_hms_opt(12, 0, 0).unwrap());
///
/// assert!(span.contains(&day.and_hms_opt(6, 0, 0).unwrap()));
/// assert!(!span.contains(&day.and_hms_opt(12, 0, 0).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Wall-clock interval alias.
pub type WallPeriod = Interval<NaiveDateTime>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns `end − start`.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: &T) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
