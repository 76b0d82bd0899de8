// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The sexagenary cycle.
//!
//! Stems and branches are plain integer-indexed enums; their Hanja/Hangul
//! names live in [`fmt`](crate::fmt). A [`GanZhi`] is stored as its cycle
//! index `0..60`, from which both halves are recovered (`index mod 10`,
//! `index mod 12`).
//!
//! Anchors:
//!
//! | Unit | Rule | Index 0 (갑자) |
//! |------|------|----------------|
//! | Day  | `(jdn − 2451551) mod 60` | 2000-01-07 |
//! | Year | `(year − 4) mod 60` | 1984 |

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Julian Day Number of a 갑자 day (2000-01-07).
pub const DAY_ANCHOR_JDN: i64 = 2_451_551;

/// Year whose pillar is 갑자 modulo 60 (`(year − 4) mod 60`).
pub const YEAR_ANCHOR: i32 = 4;

/// The five phases.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// Yang (even index) or Yin (odd index).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    #[inline]
    const fn of_index(index: u8) -> Self {
        if index % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

/// Heavenly stem (천간), index 0–9.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    /// Stem at `index`, wrapped into `0..10`.
    #[inline]
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(10) as usize]
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Element: `index ÷ 2 mod 5` → Wood, Fire, Earth, Metal, Water.
    pub const fn element(self) -> Element {
        match self.index() / 2 {
            0 => Element::Wood,
            1 => Element::Fire,
            2 => Element::Earth,
            3 => Element::Metal,
            _ => Element::Water,
        }
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }
}

/// Earthly branch (지지), index 0–11.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    /// Branch at `index`, wrapped into `0..12`.
    #[inline]
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(12) as usize]
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn element(self) -> Element {
        match self {
            Branch::In | Branch::Myo => Element::Wood,
            Branch::Sa | Branch::O => Element::Fire,
            Branch::Chuk | Branch::Jin | Branch::Mi | Branch::Sul => Element::Earth,
            Branch::Sin | Branch::Yu => Element::Metal,
            Branch::Hae | Branch::Ja => Element::Water,
        }
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }

    /// Clock window `[start, end)` in minutes after midnight. Ja wraps
    /// midnight and reports `(1380, 60)`.
    pub const fn clock_window(self) -> (u32, u32) {
        let start = (self.index() as u32 * 120 + 1380) % 1440;
        (start, (start + 120) % 1440)
    }

    /// Branch whose clock window contains `minute_of_day` (0–1439).
    ///
    /// ```
    /// use ganji::Branch;
    ///
    /// assert_eq!(Branch::from_clock(23 * 60), Branch::Ja);
    /// assert_eq!(Branch::from_clock(60), Branch::Chuk);
    /// assert_eq!(Branch::from_clock(12 * 60 + 59), Branch::O);
    /// ```
    #[inline]
    pub fn from_clock(minute_of_day: u32) -> Self {
        Self::from_index(i64::from((minute_of_day + 60) / 120))
    }
}

/// A sexagenary pair, stored as its cycle index `0..60`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct GanZhi(u8);

impl GanZhi {
    /// 갑자, index 0.
    pub const GAPJA: GanZhi = GanZhi(0);

    /// Pair at `index`, wrapped with `((i mod 60) + 60) mod 60`.
    #[inline]
    pub fn new(index: i64) -> Self {
        GanZhi(index.rem_euclid(60) as u8)
    }

    /// Build from a stem and branch, rejecting mismatched parities.
    ///
    /// ```
    /// use ganji::{Branch, GanZhi, Stem};
    ///
    /// assert_eq!(GanZhi::from_parts(Stem::Gap, Branch::In).unwrap().index(), 50);
    /// assert!(GanZhi::from_parts(Stem::Gap, Branch::Chuk).is_err());
    /// ```
    pub fn from_parts(stem: Stem, branch: Branch) -> Result<Self> {
        let (s, b) = (stem.index(), branch.index());
        if s % 2 != b % 2 {
            return Err(Error::ParityMismatch { stem: s, branch: b });
        }
        Ok(Self::new(6 * i64::from(s) - 5 * i64::from(b)))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn stem(self) -> Stem {
        Stem::from_index(i64::from(self.0))
    }

    #[inline]
    pub fn branch(self) -> Branch {
        Branch::from_index(i64::from(self.0))
    }

    /// Step `steps` positions along the cycle (negative walks backwards).
    #[inline]
    pub fn offset(self, steps: i64) -> Self {
        Self::new(i64::from(self.0) + steps)
    }

    #[inline]
    pub fn next(self) -> Self {
        self.offset(1)
    }

    #[inline]
    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// Day pillar of a Julian Day Number.
    #[inline]
    pub fn for_jdn(jdn: i64) -> Self {
        Self::new(jdn - DAY_ANCHOR_JDN)
    }

    /// Year pillar of an effective (Ipchun-resolved) year.
    #[inline]
    pub fn for_year(year: i32) -> Self {
        Self::new(i64::from(year) - i64::from(YEAR_ANCHOR))
    }

    /// Month pillar for month `ordinal` (1 = 인월) of a year with `year_stem`.
    ///
    /// The year stem fixes the stem of the first month: 갑/기 → 병인,
    /// 을/경 → 무인, 병/신 → 경인, 정/임 → 임인, 무/계 → 갑인.
    pub fn for_month(year_stem: Stem, ordinal: u8) -> Self {
        let first = (i64::from(year_stem.index()) % 5) * 2 + 2;
        let step = i64::from(ordinal) - 1;
        let stem = Stem::from_index(first + step);
        let branch = Branch::from_index(2 + step);
        Self::combine(stem, branch)
    }

    /// Hour pillar for `branch` on a day with `day_stem`.
    ///
    /// `shifted` adds two stems; it is set when a night hour is counted on
    /// the previous day and must keep the stem of the following day's cycle.
    pub fn for_hour(day_stem: Stem, branch: Branch, shifted: bool) -> Self {
        let base = (i64::from(day_stem.index()) % 5) * 2 + i64::from(branch.index());
        let stem = Stem::from_index(base + if shifted { 2 } else { 0 });
        Self::combine(stem, branch)
    }

    /// Stems and branches produced by the tables above always share parity.
    #[inline]
    fn combine(stem: Stem, branch: Branch) -> Self {
        debug_assert_eq!(stem.index() % 2, branch.index() % 2);
        Self::new(6 * i64::from(stem.index()) - 5 * i64::from(branch.index()))
    }
}

impl TryFrom<u8> for GanZhi {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if value < 60 {
            Ok(GanZhi(value))
        } else {
            Err(Error::unknown_symbol("sexagenary index", value.to_string()))
        }
    }
}

impl From<GanZhi> for u8 {
    fn from(value: GanZhi) -> Self {
        value.0
    }
}
