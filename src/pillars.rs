// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The four pillars (사주) of an instant.
//!
//! Year and month pillars depend on solar terms and therefore on a
//! [`SolarTermLocator`]; they are methods of [`PillarCalculator`]. Day and
//! hour pillars only need the clock and the day-boundary rule and are free
//! functions.
//!
//! Solar terms are compared in the standard time of the region (UTC plus
//! `meridian / 15` hours), the same clock the wall-clock input is read on.
//! Month boundaries are the jie terms plus a fixed offset (30 min by
//! default); the year pillar uses the raw Ipchun instant.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tracing::trace;

use crate::config::EngineConfig;
use crate::correction::utc_offset;
use crate::cycle::{GanZhi, Stem};
use crate::day_boundary::{self, DayBoundaryRule};
use crate::error::Result;
use crate::input::Longitude;
use crate::julian_date_ext::jdn_of;
use crate::solar_term::{SolarTerm, SolarTermLocator};
use crate::WallPeriod;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Year, month, day and (when the birth time is known) hour pillars.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pillars4 {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: Option<GanZhi>,
}

impl Pillars4 {
    /// Pillars in chart order, hour last.
    pub fn iter(&self) -> impl Iterator<Item = GanZhi> + '_ {
        [Some(self.year), Some(self.month), Some(self.day), self.hour]
            .into_iter()
            .flatten()
    }
}

/// Where an instant sits among the twelve sexagenary months.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonthPosition {
    /// Civil year whose Ipchun opens the month-year.
    pub month_year: i32,
    /// 1 = 인월 … 12 = 축월.
    pub ordinal: u8,
    /// Month span in standard time, boundaries included.
    pub span: WallPeriod,
    pub ganzhi: GanZhi,
}

/// Day pillar of a wall-clock instant under `rule`.
///
/// ```
/// use chrono::NaiveDate;
/// use ganji::{pillars, DayBoundaryRule, GanZhi};
///
/// let noon = NaiveDate::from_ymd_opt(2000, 1, 7).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(pillars::day_pillar(&noon, DayBoundaryRule::SplitMidnight), GanZhi::GAPJA);
/// ```
pub fn day_pillar(instant: &NaiveDateTime, rule: DayBoundaryRule) -> GanZhi {
    let jdn = jdn_of(instant.date()) + day_boundary::day_offset(instant, rule);
    GanZhi::for_jdn(jdn)
}

/// Hour pillar of a wall-clock instant under `rule`.
///
/// `day_stem` overrides the stem of the day the hour is counted on; when
/// `None` it is taken from [`day_pillar`].
pub fn hour_pillar(
    instant: &NaiveDateTime,
    rule: DayBoundaryRule,
    day_stem: Option<Stem>,
) -> GanZhi {
    let resolution = day_boundary::resolve(instant, rule);
    let stem = day_stem.unwrap_or_else(|| day_pillar(instant, rule).stem());
    GanZhi::for_hour(stem, resolution.branch, resolution.shifted)
}

/// Year and month pillars backed by a solar-term locator.
#[derive(Debug, Default)]
pub struct PillarCalculator {
    locator: SolarTermLocator,
    config: EngineConfig,
}

impl PillarCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            locator: SolarTermLocator::new(config.search),
            config,
        }
    }

    pub fn locator(&self) -> &SolarTermLocator {
        &self.locator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// `term` of the solar year opened by Ipchun of `year`, in standard time.
    pub fn term_local(
        &self,
        year: i32,
        term: SolarTerm,
        longitude: Longitude,
    ) -> Result<NaiveDateTime> {
        let utc = self.locator.term(year, term, longitude)?;
        Ok(utc.naive_utc() + utc_offset(longitude))
    }

    /// Ipchun of `year` in standard time.
    pub fn ipchun(&self, year: i32, longitude: Longitude) -> Result<NaiveDateTime> {
        self.term_local(year, SolarTerm::Ipchun, longitude)
    }

    /// The year whose pillar applies to `instant`.
    pub fn effective_year(&self, instant: &NaiveDateTime, longitude: Longitude) -> Result<i32> {
        let year = instant.year();
        let ipchun = self.ipchun(year, longitude)?;
        Ok(if *instant < ipchun { year - 1 } else { year })
    }

    pub fn year_pillar(&self, instant: &NaiveDateTime, longitude: Longitude) -> Result<GanZhi> {
        let year = self.effective_year(instant, longitude)?;
        let pillar = GanZhi::for_year(year);
        trace!(%instant, year, %pillar, "year pillar");
        Ok(pillar)
    }

    /// The thirteen month boundaries (twelve openers plus the next Ipchun)
    /// of the month-year starting in `year`, in standard time plus the
    /// configured offset.
    pub fn month_boundaries(
        &self,
        year: i32,
        longitude: Longitude,
    ) -> Result<Vec<NaiveDateTime>> {
        let offset = self.config.month_boundary_offset();
        let mut bounds = Vec::with_capacity(13);
        for term in SolarTerm::JIE {
            bounds.push(self.term_local(year, term, longitude)? + offset);
        }
        bounds.push(self.ipchun(year + 1, longitude)? + offset);
        Ok(bounds)
    }

    /// Locate `instant` among the months of its month-year.
    pub fn month_position(
        &self,
        instant: &NaiveDateTime,
        longitude: Longitude,
    ) -> Result<MonthPosition> {
        let civil = instant.year();
        let mut month_year = civil;
        let mut bounds = self.month_boundaries(civil, longitude)?;
        if *instant < bounds[0] {
            month_year = civil - 1;
            bounds = self.month_boundaries(month_year, longitude)?;
        }
        // bounds[0] <= instant < bounds[12] holds here, so one window matches.
        let index = bounds
            .windows(2)
            .position(|w| w[0] <= *instant && *instant < w[1])
            .unwrap_or(11);
        let ordinal = (index + 1) as u8;
        let year_stem = GanZhi::for_year(month_year).stem();
        let ganzhi = GanZhi::for_month(year_stem, ordinal);
        trace!(%instant, month_year, ordinal, %ganzhi, "month pillar");
        Ok(MonthPosition {
            month_year,
            ordinal,
            span: WallPeriod::new(bounds[index], bounds[index + 1]),
            ganzhi,
        })
    }

    pub fn month_pillar(&self, instant: &NaiveDateTime, longitude: Longitude) -> Result<GanZhi> {
        Ok(self.month_position(instant, longitude)?.ganzhi)
    }

    /// All four pillars of a (corrected) birth moment.
    ///
    /// With `time == None` the year, month and day are taken at 12:00 and
    /// the hour pillar is absent.
    pub fn pillars(
        &self,
        date: NaiveDate,
        time: Option<NaiveTime>,
        longitude: Longitude,
        rule: DayBoundaryRule,
    ) -> Result<Pillars4> {
        let sample = date.and_time(time.unwrap_or_else(noon));
        let day = day_pillar(&sample, rule);
        Ok(Pillars4 {
            year: self.year_pillar(&sample, longitude)?,
            month: self.month_pillar(&sample, longitude)?,
            day,
            hour: time.map(|_| hour_pillar(&sample, rule, Some(day.stem()))),
        })
    }
}

/// 12:00, the sampling time for births without a known hour.
#[inline]
pub(crate) fn noon() -> NaiveTime {
    NaiveTime::MIN + TimeDelta::hours(12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::Branch;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn day_anchor_is_gapja_under_every_rule() {
        let noon = at(2000, 1, 7, 12, 0);
        for rule in DayBoundaryRule::ALL {
            assert_eq!(day_pillar(&noon, rule), GanZhi::GAPJA, "{rule}");
        }
    }

    #[test]
    fn night_hours_move_the_day() {
        let late = at(2000, 1, 6, 23, 30);
        assert_eq!(day_pillar(&late, DayBoundaryRule::Midnight), GanZhi::GAPJA);
        assert_eq!(day_pillar(&late, DayBoundaryRule::SplitMidnight), GanZhi::GAPJA);
        assert_eq!(day_pillar(&late, DayBoundaryRule::TigerHour), GanZhi::new(59));
        let early = at(2000, 1, 8, 2, 0);
        assert_eq!(day_pillar(&early, DayBoundaryRule::TigerHour), GanZhi::GAPJA);
    }

    #[test]
    fn hour_stems_follow_the_day() {
        let noon = at(2000, 1, 7, 12, 0);
        // 갑 day, 오 hour → 경오.
        let gz = hour_pillar(&noon, DayBoundaryRule::SplitMidnight, None);
        assert_eq!((gz.stem(), gz.branch()), (Stem::Gyeong, Branch::O));
        // Tiger rule: 01:00 on the 8th is counted on the 갑 day but keeps
        // the 을 day's cycle (정축).
        let early = at(2000, 1, 8, 1, 0);
        let gz = hour_pillar(&early, DayBoundaryRule::TigerHour, None);
        assert_eq!((gz.stem(), gz.branch()), (Stem::Jeong, Branch::Chuk));
        assert_eq!(
            hour_pillar(&early, DayBoundaryRule::TigerHour, Some(Stem::Gye)),
            GanZhi::for_hour(Stem::Gye, Branch::Chuk, true)
        );
    }

    #[test]
    fn late_ja_hour_takes_the_next_day_cycle() {
        // 23:30 before the 갑 day opens the 갑 day's cycle at 갑자 whichever
        // rule places the day pillar.
        let late = at(2000, 1, 6, 23, 30);
        for rule in DayBoundaryRule::ALL {
            assert_eq!(hour_pillar(&late, rule, None), GanZhi::GAPJA, "{rule}");
        }
        let midnight = at(2000, 1, 6, 23, 0);
        assert_eq!(
            hour_pillar(&midnight, DayBoundaryRule::Midnight, None),
            GanZhi::GAPJA
        );
        let before = at(2000, 1, 6, 22, 59);
        let gz = hour_pillar(&before, DayBoundaryRule::Midnight, None);
        assert_eq!((gz.stem(), gz.branch()), (Stem::Gye, Branch::Hae));
    }

    #[test]
    fn year_turns_at_ipchun() {
        let calc = PillarCalculator::default();
        let ipchun = calc.ipchun(2024, Longitude::SEOUL).unwrap();
        let before = ipchun - TimeDelta::minutes(1);
        let after = ipchun + TimeDelta::minutes(1);
        assert_eq!(calc.year_pillar(&before, Longitude::SEOUL), Ok(GanZhi::for_year(2023)));
        assert_eq!(calc.year_pillar(&after, Longitude::SEOUL), Ok(GanZhi::for_year(2024)));
    }

    #[test]
    fn month_boundary_lags_ipchun_by_half_an_hour() {
        let calc = PillarCalculator::default();
        let ipchun = calc.ipchun(2024, Longitude::SEOUL).unwrap();

        let inside_offset = calc
            .month_position(&(ipchun + TimeDelta::minutes(1)), Longitude::SEOUL)
            .unwrap();
        assert_eq!(inside_offset.month_year, 2023);
        assert_eq!(inside_offset.ordinal, 12);
        assert_eq!(inside_offset.ganzhi, GanZhi::new(1)); // 을축

        let past_offset = calc
            .month_position(&(ipchun + TimeDelta::minutes(31)), Longitude::SEOUL)
            .unwrap();
        assert_eq!(past_offset.month_year, 2024);
        assert_eq!(past_offset.ordinal, 1);
        assert_eq!(past_offset.ganzhi, GanZhi::new(2)); // 병인
        assert_eq!(past_offset.span.start, ipchun + TimeDelta::minutes(30));
    }

    #[test]
    fn months_tile_the_year() {
        let calc = PillarCalculator::default();
        let bounds = calc.month_boundaries(1996, Longitude::SEOUL).unwrap();
        assert_eq!(bounds.len(), 13);
        for w in bounds.windows(2) {
            assert!((29..=32).contains(&(w[1] - w[0]).num_days()), "{w:?}");
        }
        for (i, w) in bounds.windows(2).enumerate() {
            let mid = w[0] + (w[1] - w[0]) / 2;
            let pos = calc.month_position(&mid, Longitude::SEOUL).unwrap();
            assert_eq!(usize::from(pos.ordinal), i + 1);
            assert_eq!(pos.ganzhi.branch(), Branch::from_index(i as i64 + 2));
        }
    }

    #[test]
    fn ipchun_lands_on_february_3_to_5() {
        let calc = PillarCalculator::default();
        for lon in [97.5, 127.5, 157.5] {
            let longitude = Longitude::from_degrees(lon);
            for year in (1900..=2100).step_by(if lon == 127.5 { 1 } else { 7 }) {
                let ipchun = calc.ipchun(year, longitude).unwrap();
                assert_eq!(ipchun.month(), 2, "{year} at {lon}");
                assert!((3..=5).contains(&ipchun.day()), "{year} at {lon}: {ipchun}");
            }
        }
    }

    #[test]
    fn corrected_seoul_scenario() {
        // 1996-12-29 16:03 at 127.5°E, corrected to 15:31:05.
        let calc = PillarCalculator::default();
        let corrected = at(1996, 12, 29, 15, 31) + TimeDelta::milliseconds(5_684);
        let pillars = calc
            .pillars(
                corrected.date(),
                Some(corrected.time()),
                Longitude::SEOUL,
                DayBoundaryRule::SplitMidnight,
            )
            .unwrap();
        assert_eq!(pillars.year.to_string(), "丙子");
        assert_eq!(pillars.month.to_string(), "庚子");
        assert_eq!(pillars.day.to_string(), "庚子");
        assert_eq!(pillars.hour.map(|h| h.to_string()).as_deref(), Some("甲申"));
        assert_eq!(pillars.iter().count(), 4);
    }

    #[test]
    fn unknown_hour_is_absent() {
        let calc = PillarCalculator::default();
        let date = NaiveDate::from_ymd_opt(1996, 12, 29).unwrap();
        let pillars = calc
            .pillars(date, None, Longitude::SEOUL, DayBoundaryRule::SplitMidnight)
            .unwrap();
        assert_eq!(pillars.hour, None);
        assert_eq!(pillars.day, GanZhi::new(36));
        assert_eq!(pillars.iter().count(), 3);
    }

    proptest! {
        #[test]
        fn day_pillar_advances_with_the_calendar(
            jdn in 2_000_000i64..2_600_000,
            days in 0i64..2_000,
            hour in 3u32..23,
            rule_index in 0usize..3,
        ) {
            let rule = DayBoundaryRule::ALL[rule_index];
            let date = crate::julian_date_ext::date_of_jdn(jdn).unwrap();
            let start = date.and_hms_opt(hour, 0, 0).unwrap();
            let later = start + TimeDelta::days(days);
            prop_assert_eq!(day_pillar(&start, rule), day_pillar(&start, rule));
            prop_assert_eq!(day_pillar(&later, rule), day_pillar(&start, rule).offset(days));
        }
    }
}
