// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chart assembly.
//!
//! [`Engine::chart`] runs the whole pipeline for one birth record:
//!
//! 1. lunar → solar normalization (with fallback),
//! 2. wall-clock → apparent local time,
//! 3. the four pillars,
//! 4. the luck direction.
//!
//! The engine owns the solar-term cache and can be shared between threads.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::config::EngineConfig;
use crate::correction::TimeCorrection;
use crate::day_boundary::DayBoundaryRule;
use crate::error::{Result, Warning};
use crate::input::{parse_time, DateFields, Longitude};
use crate::luck::{Direction, Gender, LuckCycleBuilder, LuckEvent};
use crate::lunar::{resolve_solar_date, LunarCalendar};
use crate::pillars::{noon, PillarCalculator, Pillars4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Calendar the birth date is written in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalendarKind {
    #[default]
    Solar,
    Lunar {
        is_leap: bool,
    },
}

/// A birth record as entered by a user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BirthInput {
    /// Date fields in `calendar`.
    pub date: DateFields,
    /// Wall-clock time, if known.
    pub time: Option<NaiveTime>,
    pub calendar: CalendarKind,
    /// Longitude in degrees or radians, if known.
    pub location: Option<f64>,
    pub gender: Gender,
    /// Day-boundary rule; the engine default applies when `None`.
    pub rule: Option<DayBoundaryRule>,
}

impl BirthInput {
    /// A solar-calendar record with the default rule and unknown time and place.
    pub fn new(date: impl Into<DateFields>, gender: Gender) -> Self {
        Self {
            date: date.into(),
            time: None,
            calendar: CalendarKind::Solar,
            location: None,
            gender,
            rule: None,
        }
    }

    /// Build from loosely formatted text; an empty `time` means unknown.
    pub fn parse(date: &str, time: &str, gender: &str) -> Result<Self> {
        let time = if time.trim().is_empty() {
            None
        } else {
            Some(parse_time(time)?)
        };
        Ok(Self {
            time,
            ..Self::new(DateFields::parse(date)?, gender.parse()?)
        })
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_location(mut self, longitude: f64) -> Self {
        self.location = Some(longitude);
        self
    }

    pub fn with_rule(mut self, rule: DayBoundaryRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn lunar(mut self, is_leap: bool) -> Self {
        self.calendar = CalendarKind::Lunar { is_leap };
        self
    }
}

/// The computed chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Chart {
    pub pillars: Pillars4,
    /// Gregorian birth date after lunar normalization.
    pub solar_date: NaiveDate,
    /// Corrected birth instant; `None` when the time is unknown.
    pub corrected: Option<NaiveDateTime>,
    /// Correction breakdown; `None` when the time is unknown.
    pub correction: Option<TimeCorrection>,
    pub direction: Direction,
    /// Longitude used for solar-term sampling.
    pub longitude: Longitude,
    pub rule: DayBoundaryRule,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warnings: Vec<Warning>,
}

impl Chart {
    /// Instant the luck cycles count from: the corrected birth time, or
    /// noon of the birth date when the time is unknown.
    pub fn birth_instant(&self) -> NaiveDateTime {
        self.corrected
            .unwrap_or_else(|| self.solar_date.and_time(noon()))
    }
}

/// Entry point holding configuration and the solar-term cache.
#[derive(Debug, Default)]
pub struct Engine {
    calc: PillarCalculator,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            calc: PillarCalculator::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.calc.config()
    }

    pub fn pillar_calculator(&self) -> &PillarCalculator {
        &self.calc
    }

    pub fn luck(&self) -> LuckCycleBuilder<'_> {
        LuckCycleBuilder::new(&self.calc)
    }

    fn default_longitude(&self) -> Longitude {
        Longitude::from_degrees(self.config().default_longitude)
    }

    /// Compute the chart of `input`.
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use ganji::{BirthInput, Engine, Gender};
    ///
    /// let engine = Engine::default();
    /// let input = BirthInput::new(NaiveDate::from_ymd_opt(1996, 12, 29).unwrap(), Gender::Male)
    ///     .with_time(NaiveTime::from_hms_opt(16, 3, 0).unwrap())
    ///     .with_location(127.5);
    /// let chart = engine.chart(&input, None).unwrap();
    /// assert_eq!(chart.pillars.day.to_string(), "庚子");
    /// ```
    pub fn chart(&self, input: &BirthInput, lunar: Option<&dyn LunarCalendar>) -> Result<Chart> {
        let mut warnings = Vec::new();
        let solar_date = match input.calendar {
            CalendarKind::Solar => input.date.solar()?,
            CalendarKind::Lunar { is_leap } => {
                let DateFields { year, month, day } = input.date;
                let (date, warning) = resolve_solar_date(lunar, year, month, day, is_leap)?;
                warnings.extend(warning);
                date
            }
        };

        let known = input.location.map(Longitude::parse).transpose()?;
        let longitude = known.unwrap_or_else(|| self.default_longitude());
        let rule = input.rule.unwrap_or(self.config().day_boundary);

        let correction = input
            .time
            .map(|time| {
                let raw = solar_date.and_time(time);
                match known {
                    Some(longitude) => TimeCorrection::compute(raw, longitude),
                    None => Ok(TimeCorrection::identity(raw)),
                }
            })
            .transpose()?;
        let corrected = correction.map(|c| c.corrected);

        let pillars = match corrected {
            Some(instant) => {
                self.calc
                    .pillars(instant.date(), Some(instant.time()), longitude, rule)?
            }
            None => self.calc.pillars(solar_date, None, longitude, rule)?,
        };
        let direction = Direction::for_birth(pillars.year.stem(), input.gender);
        debug!(?pillars, %direction, warnings = warnings.len(), "chart assembled");

        Ok(Chart {
            pillars,
            solar_date,
            corrected,
            correction,
            direction,
            longitude,
            rule,
            warnings,
        })
    }

    /// The configured number of decades for `chart`.
    pub fn decades(&self, chart: &Chart) -> Result<Vec<LuckEvent>> {
        self.luck().decades(
            chart.pillars.month,
            &chart.birth_instant(),
            chart.direction,
            chart.longitude,
            self.config().luck_cycle_count,
        )
    }
}
