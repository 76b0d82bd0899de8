// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solar terms (절기).
//!
//! A solar term is the instant the Sun's apparent longitude reaches a
//! multiple of 15°. The search brackets the crossing around a linear first
//! guess and refines it by bisection on
//!
//! ```text
//! r(t) = wrap±180(λ(t) − target)
//! ```
//!
//! so that the 0°/360° seam never produces a false sign change.
//!
//! Results are memoized in a [`SolarTermCache`] owned by the caller (usually
//! through a [`SolarTermLocator`]). The cache is a pure memo: dropping it
//! never changes a result.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use parking_lot::RwLock;
use qtty::Days;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::input::Longitude;
use crate::solar::{apparent_longitude, normalize_degrees};
use crate::JulianDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The 24 solar terms, in order from Ipchun (315°).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolarTerm {
    Ipchun,
    Usu,
    Gyeongchip,
    Chunbun,
    Cheongmyeong,
    Gogu,
    Ipha,
    Soman,
    Mangjong,
    Haji,
    Soseo,
    Daeseo,
    Ipchu,
    Cheoseo,
    Baengno,
    Chubun,
    Hallo,
    Sanggang,
    Ipdong,
    Soseol,
    Daeseol,
    Dongji,
    Sohan,
    Daehan,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::Ipchun,
        SolarTerm::Usu,
        SolarTerm::Gyeongchip,
        SolarTerm::Chunbun,
        SolarTerm::Cheongmyeong,
        SolarTerm::Gogu,
        SolarTerm::Ipha,
        SolarTerm::Soman,
        SolarTerm::Mangjong,
        SolarTerm::Haji,
        SolarTerm::Soseo,
        SolarTerm::Daeseo,
        SolarTerm::Ipchu,
        SolarTerm::Cheoseo,
        SolarTerm::Baengno,
        SolarTerm::Chubun,
        SolarTerm::Hallo,
        SolarTerm::Sanggang,
        SolarTerm::Ipdong,
        SolarTerm::Soseol,
        SolarTerm::Daeseol,
        SolarTerm::Dongji,
        SolarTerm::Sohan,
        SolarTerm::Daehan,
    ];

    /// The twelve month-opening terms (節), 인월 through 축월.
    pub const JIE: [SolarTerm; 12] = [
        SolarTerm::Ipchun,
        SolarTerm::Gyeongchip,
        SolarTerm::Cheongmyeong,
        SolarTerm::Ipha,
        SolarTerm::Mangjong,
        SolarTerm::Soseo,
        SolarTerm::Ipchu,
        SolarTerm::Baengno,
        SolarTerm::Hallo,
        SolarTerm::Ipdong,
        SolarTerm::Daeseol,
        SolarTerm::Sohan,
    ];

    /// Position in [`SolarTerm::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Target ecliptic longitude in degrees.
    #[inline]
    pub const fn longitude(self) -> f64 {
        ((315 + 15 * self.index()) % 360) as f64
    }

    /// Whether the term opens a sexagenary month.
    #[inline]
    pub const fn is_jie(self) -> bool {
        self.index() % 2 == 0
    }

    /// Sohan and Daehan fall in January of the civil year after the one
    /// whose Ipchun starts their solar year.
    #[inline]
    pub const fn year_offset(self) -> i32 {
        match self {
            SolarTerm::Sohan | SolarTerm::Daehan => 1,
            _ => 0,
        }
    }
}

/// A located solar term.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermInstant {
    pub term: SolarTerm,
    pub utc: DateTime<Utc>,
}

/// Residual in degrees: `λ(jd) − target`, wrapped into `[-180, 180)`.
#[inline]
fn residual(jd: JulianDate, target: f64) -> f64 {
    (apparent_longitude(jd) - target + 180.0).rem_euclid(360.0) - 180.0
}

/// Bracket the crossing around `estimate`, then bisect.
fn bisect(estimate: JulianDate, target: f64, search: &SearchConfig) -> JulianDate {
    let half = Days::new(search.half_window_days);
    let (mut a, mut b) = (estimate - half, estimate + half);
    let (mut fa, mut fb) = (residual(a, target), residual(b, target));

    let mut expansions = 0;
    while fa * fb > 0.0 && expansions < search.max_expansions {
        a = a - Days::new(1.0);
        b = b + Days::new(1.0);
        fa = residual(a, target);
        fb = residual(b, target);
        expansions += 1;
        debug!(target_deg = target, expansions, "widened solar-term bracket");
    }
    if fa * fb > 0.0 {
        warn!(
            target_deg = target,
            estimate = estimate.value(),
            "no sign change after {expansions} expansions; returning best estimate"
        );
    }

    for _ in 0..search.max_iterations {
        let mid = a.mean(b);
        let fm = residual(mid, target);
        if fm.abs() < search.tolerance_deg {
            return mid;
        }
        if fa * fm <= 0.0 {
            b = mid;
        } else {
            a = mid;
            fa = fm;
        }
    }
    a.mean(b)
}

/// Locate the UTC instant in `year` at which the apparent solar longitude
/// equals `target_deg`, without caching.
///
/// The first guess starts from local noon of January 1 at `sample`.
///
/// ```
/// use chrono::Datelike;
/// use ganji::{solar_term, Longitude, SearchConfig};
///
/// let ipchun = solar_term::find_solar_term(2024, 315.0, Longitude::SEOUL, &SearchConfig::default()).unwrap();
/// assert_eq!((ipchun.month(), ipchun.day()), (2, 4));
/// ```
pub fn find_solar_term(
    year: i32,
    target_deg: f64,
    sample: Longitude,
    search: &SearchConfig,
) -> Result<DateTime<Utc>> {
    let target = normalize_degrees(target_deg);
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::OutOfRange(year))?;
    let noon_hours = 12.0 - sample.degrees() / 15.0;
    let local_noon = jan1.and_time(NaiveTime::MIN)
        + TimeDelta::milliseconds((noon_hours * 3_600_000.0).round() as i64);

    let jd0 = JulianDate::from_utc(local_noon.and_utc());
    let ahead = normalize_degrees(target - apparent_longitude(jd0));
    let estimate = jd0 + Days::new(ahead / search.mean_rate_deg_per_day);

    bisect(estimate, target, search)
        .to_utc()
        .ok_or(Error::OutOfRange(year))
}

/// Cache key: year plus the exact bit patterns of both longitudes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct TermKey {
    year: i32,
    target_bits: u64,
    sample_bits: u64,
}

/// Thread-safe memo of located terms.
#[derive(Debug, Default)]
pub struct SolarTermCache {
    entries: RwLock<HashMap<TermKey, DateTime<Utc>>>,
}

impl SolarTermCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized terms.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn get_or_try_insert(
        &self,
        key: TermKey,
        compute: impl FnOnce() -> Result<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>> {
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(*hit);
        }
        debug!(year = key.year, "solar term cache miss");
        // Racing writers compute the same value, so last-write-wins is harmless.
        let value = compute()?;
        self.entries.write().insert(key, value);
        Ok(value)
    }
}

/// Solar-term search with an owned memo cache.
#[derive(Debug, Default)]
pub struct SolarTermLocator {
    search: SearchConfig,
    cache: SolarTermCache,
}

impl SolarTermLocator {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search,
            cache: SolarTermCache::new(),
        }
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    pub fn cache(&self) -> &SolarTermCache {
        &self.cache
    }

    /// Memoized [`find_solar_term`].
    pub fn find(&self, year: i32, target_deg: f64, sample: Longitude) -> Result<DateTime<Utc>> {
        let target = normalize_degrees(target_deg);
        let key = TermKey {
            year,
            target_bits: target.to_bits(),
            sample_bits: sample.degrees().to_bits(),
        };
        self.cache
            .get_or_try_insert(key, || find_solar_term(year, target, sample, &self.search))
    }

    /// `term` of the solar year that begins with Ipchun of `year`.
    pub fn term(&self, year: i32, term: SolarTerm, sample: Longitude) -> Result<DateTime<Utc>> {
        self.find(year + term.year_offset(), term.longitude(), sample)
    }

    /// All 24 terms of the solar year starting with Ipchun of `year`, in order.
    pub fn terms_for_year(&self, year: i32, sample: Longitude) -> Result<Vec<TermInstant>> {
        SolarTerm::ALL
            .iter()
            .map(|&term| {
                Ok(TermInstant {
                    term,
                    utc: self.term(year, term, sample)?,
                })
            })
            .collect()
    }

    /// The twelve month-opening terms of the solar year starting in `year`.
    pub fn jie_boundaries(&self, year: i32, sample: Longitude) -> Result<Vec<TermInstant>> {
        SolarTerm::JIE
            .iter()
            .map(|&term| {
                Ok(TermInstant {
                    term,
                    utc: self.term(year, term, sample)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn kst(utc: DateTime<Utc>) -> chrono::NaiveDateTime {
        utc.naive_utc() + TimeDelta::hours(9)
    }

    #[test]
    fn term_table() {
        assert_eq!(SolarTerm::Ipchun.longitude(), 315.0);
        assert_eq!(SolarTerm::Chunbun.longitude(), 0.0);
        assert_eq!(SolarTerm::Dongji.longitude(), 270.0);
        assert_eq!(SolarTerm::Daehan.longitude(), 300.0);
        assert_eq!(SolarTerm::JIE.iter().filter(|t| t.is_jie()).count(), 12);
        for (i, term) in SolarTerm::ALL.iter().enumerate() {
            assert_eq!(term.index(), i);
        }
    }

    #[test]
    fn ipchun_2024_matches_published_time() {
        // Published: 2024-02-04 17:27 KST. The low-precision theory lands
        // within a quarter of an hour.
        let utc = find_solar_term(2024, 315.0, Longitude::SEOUL, &SearchConfig::default()).unwrap();
        let published = Utc.with_ymd_and_hms(2024, 2, 4, 8, 27, 0).unwrap();
        assert!((utc - published).num_minutes().abs() <= 15, "{utc}");
    }

    #[test]
    fn converged_root_has_tiny_residual() {
        let utc = find_solar_term(1996, 255.0, Longitude::SEOUL, &SearchConfig::default()).unwrap();
        let jd = JulianDate::from_utc(utc);
        assert!(residual(jd, 255.0).abs() < 1e-5);
    }

    #[test]
    fn winter_terms_stay_in_their_civil_year() {
        let locator = SolarTermLocator::default();
        let dongji = kst(locator.term(2024, SolarTerm::Dongji, Longitude::SEOUL).unwrap());
        assert_eq!((dongji.year(), dongji.month()), (2024, 12));
        let sohan = kst(locator.term(2024, SolarTerm::Sohan, Longitude::SEOUL).unwrap());
        assert_eq!((sohan.year(), sohan.month()), (2025, 1));
    }

    #[test]
    fn terms_are_strictly_increasing() {
        let locator = SolarTermLocator::default();
        let terms = locator.terms_for_year(1996, Longitude::SEOUL).unwrap();
        assert_eq!(terms.len(), 24);
        for pair in terms.windows(2) {
            let gap = pair[1].utc - pair[0].utc;
            assert!(
                (14..=17).contains(&gap.num_days()),
                "{:?} → {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn cache_is_a_pure_memo() {
        let locator = SolarTermLocator::default();
        assert!(locator.cache().is_empty());
        let first = locator.find(2000, 315.0, Longitude::SEOUL).unwrap();
        assert_eq!(locator.cache().len(), 1);
        let again = locator.find(2000, 315.0, Longitude::SEOUL).unwrap();
        assert_eq!(locator.cache().len(), 1);
        locator.cache().clear();
        let recomputed = locator.find(2000, 315.0, Longitude::SEOUL).unwrap();
        assert_eq!(first, again);
        assert_eq!(first, recomputed);
        assert_eq!(
            first,
            find_solar_term(2000, 315.0, Longitude::SEOUL, &SearchConfig::default()).unwrap()
        );
    }

    #[test]
    fn starved_search_still_returns_an_estimate() {
        let search = SearchConfig {
            half_window_days: 0.01,
            max_expansions: 0,
            max_iterations: 5,
            ..SearchConfig::default()
        };
        let rough = find_solar_term(2024, 315.0, Longitude::SEOUL, &search).unwrap();
        let exact = find_solar_term(2024, 315.0, Longitude::SEOUL, &SearchConfig::default()).unwrap();
        assert!((rough - exact).num_days().abs() <= 2);
    }

    #[test]
    fn locator_is_shareable_across_threads() {
        let locator = SolarTermLocator::default();
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| locator.find(2010, 315.0, Longitude::SEOUL).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(locator.cache().len(), 1);
    }
}
