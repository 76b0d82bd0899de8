// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy for the engine.
//!
//! Invalid input fails fast. A failed lunar conversion is recoverable and is
//! surfaced to callers as a [`Warning`] instead of aborting a chart.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Calendar date fields that do not name a real Gregorian date.
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Clock fields outside `00:00:00..=23:59:59`.
    #[error("invalid time: {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },

    /// Text that could not be parsed as a date or time.
    #[error("cannot parse {kind} from {input:?}")]
    Unparseable { kind: &'static str, input: String },

    /// A longitude that is NaN or infinite.
    #[error("longitude must be finite, got {0}")]
    InvalidLongitude(f64),

    /// The instant falls outside the representable calendar range.
    #[error("year {0} is outside the supported calendar range")]
    OutOfRange(i32),

    /// Stem/branch text outside the 10- or 12-symbol alphabets.
    #[error("unknown {kind} symbol {symbol:?}")]
    UnknownSymbol { kind: &'static str, symbol: String },

    /// A stem/branch pair whose parities differ (not one of the 60 pairs).
    #[error("stem {stem} and branch {branch} do not form a sexagenary pair")]
    ParityMismatch { stem: u8, branch: u8 },

    /// The lunar table has no entry for the requested date.
    #[error("lunar date {year}-{month:02}-{day:02}{} cannot be converted", leap_suffix(.leap))]
    ConversionUnavailable {
        year: i32,
        month: u32,
        day: u32,
        leap: bool,
    },
}

impl Error {
    /// Create an [`Error::InvalidDate`].
    pub fn invalid_date(year: i32, month: u32, day: u32) -> Self {
        Self::InvalidDate { year, month, day }
    }

    /// Create an [`Error::UnknownSymbol`].
    pub fn unknown_symbol(kind: &'static str, symbol: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            kind,
            symbol: symbol.into(),
        }
    }

    /// Create an [`Error::Unparseable`].
    pub fn unparseable(kind: &'static str, input: impl Into<String>) -> Self {
        Self::Unparseable {
            kind,
            input: input.into(),
        }
    }
}

fn leap_suffix(leap: &bool) -> &'static str {
    if *leap {
        " (leap)"
    } else {
        ""
    }
}

/// Non-fatal conditions collected while assembling a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The lunar birth date could not be converted; the unconverted date was used.
    LunarFallback(Error),
}
