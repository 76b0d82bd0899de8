// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Presentation tables.
//!
//! Script-specific names are kept out of the engine types; everything that
//! renders or parses Hangul/Hanja goes through these tables.

use crate::cycle::{Branch, Element, GanZhi, Stem};
use crate::solar_term::SolarTerm;
use std::fmt;

/// Stems in Hanja, by index.
pub const STEM_HANJA: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];
/// Stems in Hangul, by index.
pub const STEM_HANGUL: [char; 10] = ['갑', '을', '병', '정', '무', '기', '경', '신', '임', '계'];
/// Branches in Hanja, by index.
pub const BRANCH_HANJA: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];
/// Branches in Hangul, by index.
pub const BRANCH_HANGUL: [char; 12] = [
    '자', '축', '인', '묘', '진', '사', '오', '미', '신', '유', '술', '해',
];

const SOLAR_TERM_HANJA: [&str; 24] = [
    "立春", "雨水", "驚蟄", "春分", "清明", "穀雨", "立夏", "小滿", "芒種", "夏至", "小暑", "大暑",
    "立秋", "處暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
];
const SOLAR_TERM_HANGUL: [&str; 24] = [
    "입춘", "우수", "경칩", "춘분", "청명", "곡우", "입하", "소만", "망종", "하지", "소서", "대서",
    "입추", "처서", "백로", "추분", "한로", "상강", "입동", "소설", "대설", "동지", "소한", "대한",
];

/// Output script.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Script {
    #[default]
    Hanja,
    Hangul,
}

pub fn stem(stem: Stem, script: Script) -> char {
    let table = match script {
        Script::Hanja => &STEM_HANJA,
        Script::Hangul => &STEM_HANGUL,
    };
    table[usize::from(stem.index())]
}

pub fn branch(branch: Branch, script: Script) -> char {
    let table = match script {
        Script::Hanja => &BRANCH_HANJA,
        Script::Hangul => &BRANCH_HANGUL,
    };
    table[usize::from(branch.index())]
}

/// Two-character name of a pair.
///
/// ```
/// use ganji::{fmt, GanZhi};
///
/// assert_eq!(fmt::ganzhi(GanZhi::new(26), fmt::Script::Hangul), "경인");
/// assert_eq!(fmt::ganzhi(GanZhi::new(26), fmt::Script::Hanja), "庚寅");
/// ```
pub fn ganzhi(gz: GanZhi, script: Script) -> String {
    [stem(gz.stem(), script), branch(gz.branch(), script)]
        .iter()
        .collect()
}

pub fn element(element: Element, script: Script) -> &'static str {
    match (element, script) {
        (Element::Wood, Script::Hanja) => "木",
        (Element::Fire, Script::Hanja) => "火",
        (Element::Earth, Script::Hanja) => "土",
        (Element::Metal, Script::Hanja) => "金",
        (Element::Water, Script::Hanja) => "水",
        (Element::Wood, Script::Hangul) => "목",
        (Element::Fire, Script::Hangul) => "화",
        (Element::Earth, Script::Hangul) => "토",
        (Element::Metal, Script::Hangul) => "금",
        (Element::Water, Script::Hangul) => "수",
    }
}

pub fn solar_term(term: SolarTerm, script: Script) -> &'static str {
    let i = term.index();
    match script {
        Script::Hanja => SOLAR_TERM_HANJA[i],
        Script::Hangul => SOLAR_TERM_HANGUL[i],
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ganzhi(*self, Script::Hanja))
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(solar_term(*self, Script::Hanja))
    }
}
