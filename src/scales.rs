// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale markers.
//!
//! | Marker | Description |
//! |--------|-------------|
//! | [`JD`] | Julian Date on the TT axis (identity) |
//! | [`UT`] | Universal Time, offset from TT by ΔT |

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date on the TT axis. The solar formulas are evaluated here.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "Julian Day:";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time (Earth rotation). Civil timestamps enter the crate here.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "UT";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let dt_secs = super::delta_t::delta_t_seconds(ut_value);
        ut_value + dt_secs.to::<qtty::Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // ΔT drifts by well under a second per day, so three passes converge.
        let mut ut = jd_tt;
        for _ in 0..3 {
            ut = jd_tt - super::delta_t::delta_t_seconds(ut).to::<qtty::Day>();
        }
        ut
    }
}

#[cfg(test)]
mod tests {
    use super::super::instant::Time;
    use super::*;
    use qtty::{Day, Seconds};

    #[test]
    fn jd_is_identity() {
        let jd = Time::<JD>::new(2_451_545.0);
        assert_eq!(jd.to::<JD>(), jd);
    }

    #[test]
    fn ut_to_tt_adds_about_a_minute_in_2000() {
        let ut = Time::<UT>::new(2_451_545.0);
        let tt = ut.to::<JD>();
        let offset = (tt.quantity() - ut.quantity()).to::<qtty::Second>();
        assert!((offset - Seconds::new(63.8)).abs() < Seconds::new(1.0));
        let back = tt.to::<UT>();
        assert!((back.quantity() - ut.quantity()).abs() < Seconds::new(1e-6).to::<Day>());
    }
}
