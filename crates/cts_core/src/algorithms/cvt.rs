//! CVT and CVT Reduced-Blanking formula family.
//!
//! All horizontal periods are in femtoseconds, derived from the target
//! vertical rate in millihertz: `2e18 / v_rate` femtoseconds per two
//! fields, minus the fixed minimum blanking duration, spread over the
//! line count. Duty-cycle math is scaled by 1e12 so the percentage
//! constants stay integral.

use crate::models::Polarity;
use crate::timing::DetailedTiming;

// Base constants C=40, J=20, K=128, M=600 and the two derived values
// the blanking model actually uses.
const C: i64 = 40;
const J: i64 = 20;
const K: i64 = 128;
const M: i64 = 600;
const C_PRIME: i64 = (C - J) * K / 256 + J;
const M_PRIME: i64 = M * K / 256;

/// Minimum vertical sync-plus-back duration, 550 us in femtoseconds.
const MIN_SYNC_AND_BACK_FS: i64 = 550_000_000_000;
/// Reduced-blanking minimum vertical blanking, 460 us in femtoseconds.
const RB_V_BLANK_FS: i64 = 460_000_000_000;
/// Duty-cycle floor, 20% scaled by 1e12.
const MIN_DUTY: i64 = 20_000_000_000_000;

pub(crate) const V_FRONT: i64 = 3;
pub(crate) const MIN_V_BACK: i64 = 6;

/// Aspect-ratio band (in quarter-percent of width) to sync width.
const ASPECT_V_SYNC: &[(i64, i64, i64)] = &[
    (2205, 2295, 5), // 16:9
    (2352, 2448, 7), // 15:9
    (2450, 2550, 6), // 16:10
    (2940, 3060, 4), // 4:3
    (3136, 3264, 7), // 5:4
];
const DEFAULT_V_SYNC: i64 = 10;

/// Vertical sync width from the aspect ratio of the full frame.
pub(crate) fn v_sync_width(h_active: i64, v_active: i64, interlaced: bool) -> i64 {
    let aspect = if interlaced {
        v_active * 8000 / h_active
    } else {
        v_active * 4000 / h_active
    };
    for &(min, max, width) in ASPECT_V_SYNC {
        if aspect >= min && aspect <= max {
            return width;
        }
    }
    DEFAULT_V_SYNC
}

fn h_period(t: &DetailedTiming) -> Option<i64> {
    let numer = 2_000_000_000_000_000_000 / t.v_rate()? - 2 * MIN_SYNC_AND_BACK_FS;
    let denom = t.v_active()? * 2 + V_FRONT * 2 + t.interlace_term();
    period(numer, denom)
}

pub(crate) fn h_period_rb(t: &DetailedTiming) -> Option<i64> {
    let numer = 2_000_000_000_000_000_000 / t.v_rate()? - 2 * RB_V_BLANK_FS;
    let denom = t.v_active()? * 2;
    period(numer, denom)
}

fn period(numer: i64, denom: i64) -> Option<i64> {
    if numer <= 0 || denom <= 0 {
        return None;
    }
    let p = numer / denom;
    (p > 0).then_some(p)
}

/// Horizontal blanking from the ideal duty-cycle model, truncated to
/// 16-pixel granularity. The duty product exceeds 64 bits at the legal
/// extremes of the rate range, so the intermediate math is i128; the
/// clamped ratio is always smaller than `h_active` and fits back.
fn h_blank_from_duty(h_active: i64, period: i64) -> i64 {
    let mut duty = C_PRIME as i128 * 1_000_000_000_000 - M_PRIME as i128 * period as i128;
    if duty < MIN_DUTY as i128 {
        duty = MIN_DUTY as i128;
    }
    (h_active as i128 * duty / (100_000_000_000_000 - duty) / 16 * 16) as i64
}

/// Vertical back porch satisfying the 550 us sync-plus-back minimum.
pub(crate) fn v_back(t: &DetailedTiming) -> Option<i64> {
    let period = h_period(t)?;
    let sync = v_sync_width(t.h_active()?, t.v_active()?, t.is_interlaced());
    let back = MIN_SYNC_AND_BACK_FS / period + 1 - sync;
    Some(back.max(MIN_V_BACK))
}

/// Vertical back porch satisfying the reduced-blanking 460 us minimum.
pub(crate) fn v_back_rb(t: &DetailedTiming) -> Option<i64> {
    let period = h_period_rb(t)?;
    let sync = v_sync_width(t.h_active()?, t.v_active()?, t.is_interlaced());
    let blank = RB_V_BLANK_FS / period + 1;
    Some((blank - V_FRONT - sync).max(MIN_V_BACK))
}

/// Fill the porch/sync/polarity set from the full CVT formula.
pub(crate) fn apply_cvt(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    let Some(period) = h_period(t) else {
        return false;
    };
    t.h_polarity = Polarity::Negative;
    t.v_polarity = Polarity::Positive;

    let blank = h_blank_from_duty(t.h_active, period);
    let sync = (t.h_active + blank) / 100 * 8;
    let back = blank / 2;
    t.h_front = back - sync;
    t.h_sync = sync;
    t.h_back = back;

    t.v_front = V_FRONT;
    t.v_sync = v_sync_width(t.h_active, t.v_active, t.interlaced);
    t.v_back = (MIN_SYNC_AND_BACK_FS / period + 1 - t.v_sync).max(MIN_V_BACK);

    finish(t)
}

/// Fill the porch/sync/polarity set from CVT Reduced-Blanking: fixed
/// 48/32/80 horizontal timing, vertical back solved for the 460 us
/// blanking minimum.
pub(crate) fn apply_cvtrb(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    let Some(back) = v_back_rb(t) else {
        return false;
    };
    t.h_polarity = Polarity::Positive;
    t.v_polarity = Polarity::Negative;

    t.h_front = 48;
    t.h_sync = 32;
    t.h_back = 80;

    t.v_front = V_FRONT;
    t.v_sync = v_sync_width(t.h_active, t.v_active, t.interlaced);
    t.v_back = back;

    finish(t)
}

fn finish(t: &mut DetailedTiming) -> bool {
    t.calc_h_blank();
    t.calc_h_total();
    t.calc_v_blank();
    t.calc_v_total();
    t.calc_p_clock_quantized();
    t.calc_actual_v_rate();
    t.calc_actual_h_rate();
    t.h_rate = t.actual_h_rate;
    t.rates_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayClass;

    fn bare(h: i64, v: i64, rate: i64, interlaced: bool) -> DetailedTiming {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(h);
        t.set_v_active(v);
        t.set_v_rate(rate);
        t.set_interlaced(interlaced);
        t
    }

    #[test]
    fn aspect_table_selects_sync_width() {
        assert_eq!(v_sync_width(1920, 1080, false), 5);
        assert_eq!(v_sync_width(1920, 1200, false), 6);
        assert_eq!(v_sync_width(640, 480, false), 4);
        assert_eq!(v_sync_width(1280, 1024, false), 7);
        // Interlaced aspect uses the full-frame height.
        assert_eq!(v_sync_width(600, 240, true), 7);
        // Off-table aspect falls back to the default.
        assert_eq!(v_sync_width(1000, 1000, false), DEFAULT_V_SYNC);
    }

    #[test]
    fn cvt_small_interlaced_reference() {
        let mut t = bare(600, 240, 60_000, true);
        assert!(apply_cvt(&mut t));
        assert_eq!(t.h_front(), Some(16));
        assert_eq!(t.h_sync(), Some(56));
        assert_eq!(t.h_back(), Some(72));
        assert_eq!(t.v_front(), Some(3));
        assert_eq!(t.v_sync(), Some(7));
        assert_eq!(t.v_back(), Some(6));
        assert_eq!(t.h_total(), Some(744));
        assert_eq!(t.v_total(), Some(256));
        // 60.000 * 744 * 513 / 2e7 = 1145.01, truncated to the 25 step.
        assert_eq!(t.p_clock(), Some(1_125));
        assert_eq!(t.h_polarity(), Polarity::Negative);
        assert_eq!(t.v_polarity(), Polarity::Positive);
    }

    #[test]
    fn cvtrb_1080p60_reference() {
        let mut t = bare(1920, 1080, 60_000, false);
        assert!(apply_cvtrb(&mut t));
        assert_eq!(t.h_front(), Some(48));
        assert_eq!(t.h_sync(), Some(32));
        assert_eq!(t.h_back(), Some(80));
        assert_eq!(t.v_front(), Some(3));
        assert_eq!(t.v_sync(), Some(5));
        assert_eq!(t.v_back(), Some(23));
        assert_eq!(t.h_total(), Some(2080));
        assert_eq!(t.v_total(), Some(1111));
        assert_eq!(t.p_clock(), Some(13_850));
        assert_eq!(t.h_polarity(), Polarity::Positive);
        assert_eq!(t.v_polarity(), Polarity::Negative);
    }

    #[test]
    fn tiny_rate_clamps_duty_and_refuses() {
        // A 5 mHz target makes the period dwarf the duty model's range;
        // the floor keeps the blanking sane and the quantized clock
        // lands at zero, so the rate group refuses to close.
        let mut t = bare(640, 1, 5, false);
        assert!(!apply_cvt(&mut t));
        assert_eq!(t.h_blank(), Some(160));
        assert_eq!(t.h_total(), Some(800));
        assert_eq!(t.p_clock(), None);
    }

    #[test]
    fn refuses_without_active_size() {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_v_rate(60_000);
        assert!(!apply_cvt(&mut t));
        assert!(!apply_cvtrb(&mut t));
    }
}
