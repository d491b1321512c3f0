//! Pixel-clock budget repair for the reduced-blanking LCD mode.
//!
//! High refresh rates push the CVT-RB clock past common link budgets
//! (330.00, 400.00, 404.00 MHz in clock units). This pass shrinks the
//! blanking intervals step by step until the clock fits, re-deriving
//! the timing between passes, and falls back to known fixed porch sets
//! when shrinking alone cannot get there.

use crate::models::Polarity;
use crate::timing::DetailedTiming;

use super::cvt;

/// Panels above this area (1080p-class) get the full budget treatment.
const LARGE_PANEL_AREA: i64 = 2_457_600;
/// WQHD area; the terminal porch sets differ on either side of it.
const WQHD_AREA: i64 = 3_686_400;

pub(super) fn fix_reduced_clock_budget(t: &mut DetailedTiming) {
    let area = t.h_active * t.v_active;
    if t.v_rate > 60_500 && area > LARGE_PANEL_AREA {
        shrink_blanking(t);
        if t.p_clock > 33_000 {
            super::settle_with(t, cvt::apply_cvtrb);
        }
        shrink_tail(t, 40_000);
        if t.p_clock > 40_000 {
            super::settle_with(t, cvt::apply_cvtrb);
        }
        shrink_tail(t, 40_400);

        if area > WQHD_AREA && t.p_clock > 40_400 {
            set_porches(t, (48, 32, 48), (3, 3, 3));
        }
        if area > WQHD_AREA && t.p_clock > 54_000 {
            t.h_polarity = Polarity::Positive;
            t.v_polarity = Polarity::Positive;
            set_porches(t, (16, 24, 24), (3, 3, 3));
        }
        if area <= WQHD_AREA && t.p_clock > 40_400 {
            set_porches(t, (48, 32, 64), (2, 2, 2));
        }
        if area <= WQHD_AREA && t.p_clock > 54_000 {
            t.h_polarity = Polarity::Positive;
            t.v_polarity = Polarity::Positive;
            set_porches(t, (4, 16, 2), (1, 1, 7));
        }
    } else if t.v_rate > 60_500 && t.p_clock > 16_500 {
        if t.h_active == 1920 && t.v_active == 1080 {
            t.h_polarity = Polarity::Positive;
            t.v_polarity = Polarity::Positive;
        }
        t.h_front = 32;
        t.h_sync = 40;
        t.h_back = 48;
        set_cvt_vertical(t);
        t.recompute_blanking_and_clock();
        shrink_largest(t);
        if t.p_clock > 16_500 {
            t.h_front = 24;
            t.h_sync = 32;
            t.h_back = 32;
            set_cvt_vertical(t);
            t.recompute_blanking_and_clock();
        }
    }
}

/// First shrink pass, one field per iteration: the vertical back porch
/// down to a 15-line blanking, then the horizontal back porch in
/// 8-pixel steps (re-solving the RB vertical back porch each step),
/// then whichever vertical field is largest, floored at 3 lines.
fn shrink_blanking(t: &mut DetailedTiming) {
    while t.p_clock > 33_000 {
        if t.v_blank > 15 {
            t.v_back -= 1;
        } else if t.h_back > 48 {
            t.h_back -= 8;
            if let Some(back) = cvt::v_back_rb(t) {
                t.v_back = back;
            }
        } else if t.v_front >= t.v_sync && t.v_front >= t.v_back - 1 && t.v_front > 3 {
            t.v_front -= 1;
        } else if t.v_sync >= t.v_front && t.v_sync >= t.v_back && t.v_sync > 3 {
            t.v_sync -= 1;
        } else if t.v_back >= t.v_front && t.v_back >= t.v_sync && t.v_back > 3 {
            t.v_back -= 3;
        } else {
            break;
        }
        t.recompute_blanking_and_clock();
    }
}

/// Later shrink passes keep more margin: 21 lines of vertical blanking
/// and a 56-pixel horizontal back porch.
fn shrink_tail(t: &mut DetailedTiming, ceiling: i64) {
    while t.p_clock > ceiling {
        if t.v_blank > 21 {
            t.v_back -= 1;
        } else if t.h_back > 56 {
            t.h_back -= 8;
            if let Some(back) = cvt::v_back_rb(t) {
                t.v_back = back;
            }
        } else {
            break;
        }
        t.recompute_blanking_and_clock();
    }
}

/// Shrink whichever porch/sync field is largest, horizontal fields in
/// 8-pixel steps floored at 8, vertical fields in single lines floored
/// at 3.
fn shrink_largest(t: &mut DetailedTiming) {
    while t.p_clock > 16_500 {
        if t.h_front >= t.h_sync && t.h_front >= t.h_back && t.h_front > 8 {
            t.h_front -= 8;
        } else if t.h_sync >= t.h_front && t.h_sync >= t.h_back && t.h_sync > 8 {
            t.h_sync -= 8;
        } else if t.h_back >= t.h_front && t.h_back >= t.h_sync && t.h_back > 8 {
            t.h_back -= 8;
        } else if t.v_front >= t.v_sync && t.v_front >= t.v_back && t.v_front > 3 {
            t.v_front -= 1;
        } else if t.v_sync >= t.v_front && t.v_sync >= t.v_back && t.v_sync > 3 {
            t.v_sync -= 1;
        } else if t.v_back >= t.v_front && t.v_back >= t.v_sync && t.v_back > 3 {
            t.v_back -= 1;
        } else {
            break;
        }
        t.recompute_blanking_and_clock();
    }
}

fn set_porches(t: &mut DetailedTiming, h: (i64, i64, i64), v: (i64, i64, i64)) {
    t.h_front = h.0;
    t.h_sync = h.1;
    t.h_back = h.2;
    t.v_front = v.0;
    t.v_sync = v.1;
    t.v_back = v.2;
    t.recompute_blanking_and_clock();
}

fn set_cvt_vertical(t: &mut DetailedTiming) {
    t.v_front = cvt::V_FRONT;
    t.v_sync = cvt::v_sync_width(t.h_active, t.v_active, t.interlaced);
    if let Some(back) = cvt::v_back(t) {
        t.v_back = back;
    }
}
