//! GTF formula family.
//!
//! Same femtosecond-period structure as CVT but with the older rounding
//! conventions: blanking gets a +8 bias before the 16-pixel truncation,
//! the sync-plus-back line count is computed in tenths of a line and
//! rounded to the nearest line, and the clock rounds to the nearest
//! unit instead of truncating to a 25-unit step.

use crate::limits::UNSET;
use crate::models::Polarity;
use crate::timing::DetailedTiming;

// GTF uses the default secondary constants; the derived pair happens to
// coincide with CVT's but the formulas consume them differently.
const C: i64 = 40;
const J: i64 = 20;
const K: i64 = 128;
const M: i64 = 600;
const C_PRIME: i64 = (C - J) * K / 256 + J;
const M_PRIME: i64 = M * K / 256;

/// Minimum vertical sync-plus-back duration in tenths of a line worth
/// of femtoseconds (550 us x 10, for one fixed-point decimal digit).
const SYNC_AND_BACK_TENTHS_FS: i64 = 5_500_000_000_000;

const V_FRONT: i64 = 1;
const V_SYNC: i64 = 3;

fn h_period(t: &DetailedTiming) -> Option<i64> {
    let numer = 2_000_000_000_000_000_000 / t.v_rate()? - 2 * 550_000_000_000;
    let denom = t.v_active()? * 2 + V_FRONT * 2 + t.interlace_term();
    if numer <= 0 || denom <= 0 {
        return None;
    }
    let p = numer / denom;
    (p > 0).then_some(p)
}

// GTF has no duty floor, so the product can run far negative and past
// 64 bits for legal inputs; the intermediate math is i128 and the
// ratio, bounded by `h_active` in magnitude, fits back in i64.
fn h_blank_from_duty(h_active: i64, period: i64) -> i64 {
    let duty = C_PRIME as i128 * 1_000_000_000_000 - M_PRIME as i128 * period as i128;
    ((h_active as i128 * duty / (100_000_000_000_000 - duty) + 8) / 16 * 16) as i64
}

/// Fill the porch/sync/polarity set from the GTF formula.
pub(crate) fn apply_gtf(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    let Some(period) = h_period(t) else {
        return false;
    };
    t.h_polarity = Polarity::Negative;
    t.v_polarity = Polarity::Positive;

    let blank = h_blank_from_duty(t.h_active, period);
    let sync = (t.h_active + blank + 50) / 100 * 8;
    let back = blank / 2;
    t.h_front = back - sync;
    t.h_sync = sync;
    t.h_back = back;

    t.v_front = V_FRONT;
    t.v_sync = V_SYNC;
    let sync_and_back = (SYNC_AND_BACK_TENTHS_FS / period + 5) / 10;
    t.v_back = sync_and_back - V_SYNC;

    t.calc_h_blank();
    t.calc_h_total();
    t.calc_v_blank();
    t.calc_v_total();
    calc_p_clock_gtf(t);
    t.calc_actual_v_rate();
    t.calc_actual_h_rate();
    t.h_rate = t.actual_h_rate;
    t.rates_supported()
}

/// Clock from the target vertical rate, rounded to the nearest unit.
fn calc_p_clock_gtf(t: &mut DetailedTiming) -> bool {
    if !(t.v_rate_supported() && t.h_total_supported() && t.v_total_supported()) {
        t.p_clock = UNSET;
        return false;
    }
    let frame = t.h_total * (t.v_total * 2 + t.interlace_term());
    t.p_clock = (t.v_rate * frame + 10_000_000) / 20_000_000;
    if !t.p_clock_supported() {
        t.p_clock = UNSET;
        return false;
    }
    true
}
