// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Luck cycles: decades (대운), years (세운), months (월운) and days (일운).
//!
//! Decades walk the sexagenary cycle from the month pillar, forward or
//! backward depending on the polarity of the year stem and the gender. The
//! first decade starts `round(d / 3)` years after birth, `d` being the
//! number of days to the neighbouring month-opening term in the direction
//! of travel. Shorter scales are plain calendars of pillars.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tracing::debug;

use crate::cycle::{GanZhi, Polarity, Stem};
use crate::error::{Error, Result};
use crate::input::Longitude;
use crate::pillars::{day_pillar, noon, PillarCalculator};
use crate::solar_term::SolarTerm;
use crate::WallPeriod;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MIN_START_AGE: i64 = 1;
const MAX_START_AGE: i64 = 10;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    /// Accepts `남`/`여`, `M`/`F` or `male`/`female` (any case).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "남" | "m" | "male" => Ok(Gender::Male),
            "여" | "f" | "female" => Ok(Gender::Female),
            _ => Err(Error::unknown_symbol("gender", s)),
        }
    }
}

/// Direction of travel along the cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Yang-stem men and Yin-stem women run forward; everyone else backward.
    ///
    /// ```
    /// use ganji::{Direction, Gender, Stem};
    ///
    /// assert_eq!(Direction::for_birth(Stem::Gap, Gender::Male), Direction::Forward);
    /// assert_eq!(Direction::for_birth(Stem::Gap, Gender::Female), Direction::Backward);
    /// ```
    pub fn for_birth(year_stem: Stem, gender: Gender) -> Self {
        match (year_stem.polarity(), gender) {
            (Polarity::Yang, Gender::Male) | (Polarity::Yin, Gender::Female) => {
                Direction::Forward
            }
            _ => Direction::Backward,
        }
    }

    /// `+1` or `−1`.
    #[inline]
    pub const fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Forward => "순행",
            Direction::Backward => "역행",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LuckScale {
    Decade,
    Year,
    Month,
    Day,
}

/// One period of a luck sequence.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LuckEvent {
    /// 1-based position in the sequence.
    pub ordinal: u32,
    /// Wall-clock span; `span.start` is the event instant.
    pub span: WallPeriod,
    pub ganzhi: GanZhi,
    pub scale: LuckScale,
    /// Age (in years) at which a decade starts. `None` for other scales.
    pub start_age: Option<u32>,
}

impl LuckEvent {
    #[inline]
    pub fn instant(&self) -> NaiveDateTime {
        self.span.start
    }
}

/// The same month, day and clock time in `year`; Feb 29 falls back to Feb 28.
pub fn anniversary(birth: &NaiveDateTime, year: i32) -> Result<NaiveDateTime> {
    let (month, day) = (birth.month(), birth.day());
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, day - 1))
        .map(|date| date.and_time(birth.time()))
        .ok_or(Error::OutOfRange(year))
}

/// Builds luck sequences on top of a [`PillarCalculator`].
#[derive(Debug, Clone, Copy)]
pub struct LuckCycleBuilder<'a> {
    calc: &'a PillarCalculator,
}

impl<'a> LuckCycleBuilder<'a> {
    pub fn new(calc: &'a PillarCalculator) -> Self {
        Self { calc }
    }

    /// Month-opening terms (standard time, no offset) around `birth`, sorted.
    fn jie_around(&self, birth: &NaiveDateTime, longitude: Longitude) -> Result<Vec<NaiveDateTime>> {
        let year = birth.year();
        let mut terms = Vec::with_capacity(24);
        for solar_year in [year - 1, year] {
            for term in SolarTerm::JIE {
                terms.push(self.calc.term_local(solar_year, term, longitude)?);
            }
        }
        terms.sort_unstable();
        Ok(terms)
    }

    /// Age at which the first decade starts, `1..=10`.
    pub fn start_age(
        &self,
        birth: &NaiveDateTime,
        direction: Direction,
        longitude: Longitude,
    ) -> Result<u32> {
        let terms = self.jie_around(birth, longitude)?;
        let neighbour = match direction {
            Direction::Forward => terms.iter().find(|t| *t > birth),
            Direction::Backward => terms.iter().rev().find(|t| *t <= birth),
        }
        .copied()
        .ok_or(Error::OutOfRange(birth.year()))?;

        let days = (neighbour - *birth).num_milliseconds().abs() as f64 / MILLIS_PER_DAY;
        let age = ((days / 3.0).round() as i64).clamp(MIN_START_AGE, MAX_START_AGE);
        debug!(%birth, %neighbour, days, age, ?direction, "decade start age");
        Ok(age as u32)
    }

    /// `count` decades starting from `month_pillar`.
    ///
    /// Decade `k` carries `month_pillar ± k` and starts on the birth
    /// anniversary `start_age + 10(k − 1)` years after birth.
    pub fn decades(
        &self,
        month_pillar: GanZhi,
        birth: &NaiveDateTime,
        direction: Direction,
        longitude: Longitude,
        count: u32,
    ) -> Result<Vec<LuckEvent>> {
        let first_age = self.start_age(birth, direction, longitude)?;
        (1..=count)
            .map(|k| {
                let age = first_age + 10 * (k - 1);
                let start = anniversary(birth, birth.year() + age as i32)?;
                let end = anniversary(birth, birth.year() + age as i32 + 10)?;
                Ok(LuckEvent {
                    ordinal: k,
                    span: WallPeriod::new(start, end),
                    ganzhi: month_pillar.offset(direction.step() * i64::from(k)),
                    scale: LuckScale::Decade,
                    start_age: Some(age),
                })
            })
            .collect()
    }

    /// Year pillars for `count` years from `first_year`, each starting at Ipchun.
    pub fn years(&self, first_year: i32, count: u32, longitude: Longitude) -> Result<Vec<LuckEvent>> {
        (0..count)
            .map(|i| {
                let year = first_year + i as i32;
                let start = self.calc.ipchun(year, longitude)?;
                let end = self.calc.ipchun(year + 1, longitude)?;
                let sample = (start + TimeDelta::days(1)).date().and_time(noon());
                Ok(LuckEvent {
                    ordinal: i + 1,
                    span: WallPeriod::new(start, end),
                    ganzhi: self.calc.year_pillar(&sample, longitude)?,
                    scale: LuckScale::Year,
                    start_age: None,
                })
            })
            .collect()
    }

    /// The twelve months of the month-year opened by Ipchun of `year`.
    pub fn months(&self, year: i32, longitude: Longitude) -> Result<Vec<LuckEvent>> {
        let bounds = self.calc.month_boundaries(year, longitude)?;
        bounds
            .windows(2)
            .zip(1..)
            .map(|(w, ordinal)| {
                let sample = w[0] + TimeDelta::days(1);
                Ok(LuckEvent {
                    ordinal,
                    span: WallPeriod::new(w[0], w[1]),
                    ganzhi: self.calc.month_pillar(&sample, longitude)?,
                    scale: LuckScale::Month,
                    start_age: None,
                })
            })
            .collect()
    }

    /// Day pillars for `count` consecutive dates from `start`, sampled at 12:00.
    pub fn days(&self, start: NaiveDate, count: u32) -> Result<Vec<LuckEvent>> {
        let rule = self.calc.config().day_boundary;
        let mut date = start;
        let mut events = Vec::with_capacity(count as usize);
        for ordinal in 1..=count {
            let next = date.succ_opt().ok_or(Error::OutOfRange(date.year()))?;
            events.push(LuckEvent {
                ordinal,
                span: WallPeriod::new(date.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)),
                ganzhi: day_pillar(&date.and_time(noon()), rule),
                scale: LuckScale::Day,
                start_age: None,
            });
            date = next;
        }
        Ok(events)
    }

    /// The decade in force at `instant`, or `None` before the first one starts.
    pub fn active_decade<'e>(
        decades: &'e [LuckEvent],
        instant: &NaiveDateTime,
    ) -> Option<&'e LuckEvent> {
        decades
            .iter()
            .take_while(|event| event.instant() <= *instant)
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn scenario_birth() -> NaiveDateTime {
        at(1996, 12, 29, 15, 31) + TimeDelta::milliseconds(5_684)
    }

    #[test]
    fn direction_truth_table() {
        for stem in Stem::ALL {
            let yang = stem.index() % 2 == 0;
            let male = Direction::for_birth(stem, Gender::Male);
            let female = Direction::for_birth(stem, Gender::Female);
            if yang {
                assert_eq!((male, female), (Direction::Forward, Direction::Backward), "{stem:?}");
            } else {
                assert_eq!((male, female), (Direction::Backward, Direction::Forward), "{stem:?}");
            }
            assert_eq!(male.step() + female.step(), 0);
        }
    }

    #[test]
    fn gender_labels() {
        assert_eq!("남".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn forward_decades_from_the_seoul_scenario() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let birth = scenario_birth();
        // Sohan 1997-01-05 16:21, about 7 days ahead.
        let decades = builder
            .decades(GanZhi::new(36), &birth, Direction::Forward, Longitude::SEOUL, 12)
            .unwrap();
        assert_eq!(decades.len(), 12);
        assert_eq!(decades[0].start_age, Some(2));
        assert_eq!(decades[0].ganzhi.to_string(), "辛丑");
        assert_eq!(decades[0].instant(), at(1998, 12, 29, 15, 31) + TimeDelta::milliseconds(5_684));
        assert_eq!(decades[11].start_age, Some(112));
        assert_eq!(decades[11].ganzhi, GanZhi::new(48));
        for pair in decades.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
            assert_eq!(pair[1].ganzhi, pair[0].ganzhi.next());
        }
    }

    #[test]
    fn backward_decades_from_the_seoul_scenario() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        // Daeseol 1996-12-07 05:08, about 22.4 days back.
        let decades = builder
            .decades(GanZhi::new(36), &scenario_birth(), Direction::Backward, Longitude::SEOUL, 3)
            .unwrap();
        assert_eq!(decades[0].start_age, Some(7));
        assert_eq!(decades[0].ganzhi.to_string(), "己亥");
        assert_eq!(decades[0].instant().year(), 2003);
        assert_eq!(decades[2].ganzhi, GanZhi::new(33));
    }

    #[test]
    fn start_age_is_clamped() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let ipchun = calc.ipchun(2024, Longitude::SEOUL).unwrap();
        let birth = ipchun + TimeDelta::minutes(1);
        assert_eq!(builder.start_age(&birth, Direction::Backward, Longitude::SEOUL), Ok(1));
        assert_eq!(builder.start_age(&birth, Direction::Forward, Longitude::SEOUL), Ok(10));
    }

    #[test]
    fn leap_day_anniversaries() {
        let birth = at(2000, 2, 29, 6, 0);
        assert_eq!(anniversary(&birth, 2001), Ok(at(2001, 2, 28, 6, 0)));
        assert_eq!(anniversary(&birth, 2004), Ok(at(2004, 2, 29, 6, 0)));
    }

    #[test]
    fn yearly_luck_starts_at_ipchun() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let years = builder.years(2024, 3, Longitude::SEOUL).unwrap();
        let names: Vec<_> = years.iter().map(|e| e.ganzhi.to_string()).collect();
        assert_eq!(names, ["甲辰", "乙巳", "丙午"]);
        for event in &years {
            assert_eq!(event.scale, LuckScale::Year);
            assert_eq!(event.instant().month(), 2);
            assert!((3..=5).contains(&event.instant().day()));
        }
        assert_eq!(years[0].span.end, years[1].span.start);
    }

    #[test]
    fn monthly_luck_covers_twelve_months() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let months = builder.months(2024, Longitude::SEOUL).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].ganzhi.to_string(), "丙寅");
        assert_eq!(months[11].ganzhi.to_string(), "丁丑");
        for (i, event) in months.iter().enumerate() {
            assert_eq!(event.ordinal as usize, i + 1);
            assert_eq!(event.ganzhi, months[0].ganzhi.offset(i as i64));
        }
    }

    #[test]
    fn daily_luck_steps_once_per_day() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let start = NaiveDate::from_ymd_opt(2000, 1, 7).unwrap();
        let days = builder.days(start, 3).unwrap();
        let indices: Vec<_> = days.iter().map(|e| e.ganzhi.index()).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(days[2].span.duration(), TimeDelta::days(1));
    }

    #[test]
    fn active_decade_lookup() {
        let calc = PillarCalculator::default();
        let builder = LuckCycleBuilder::new(&calc);
        let birth = scenario_birth();
        let decades = builder
            .decades(GanZhi::new(36), &birth, Direction::Forward, Longitude::SEOUL, 4)
            .unwrap();
        assert_eq!(LuckCycleBuilder::active_decade(&decades, &birth), None);
        let later = at(2010, 6, 1, 0, 0);
        let active = LuckCycleBuilder::active_decade(&decades, &later).unwrap();
        assert_eq!(active.ordinal, 2);
        assert!(active.span.contains(&later));
    }
}
