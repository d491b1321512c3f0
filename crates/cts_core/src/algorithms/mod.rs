//! Automatic timing modes.
//!
//! Every mode follows the same shape: consult the mode's curated
//! catalog first, and fall back to a formula family when no entry
//! matches. The fallback "settles" the formula: it runs once at the
//! target rate, re-runs at the rate the derived clock can actually
//! produce, then restores the target so the caller's intent survives.

pub mod catalog;
pub(crate) mod cvt;
mod gtf;
mod reduced;

use crate::models::{Polarity, TimingMode};
use crate::timing::DetailedTiming;

use self::catalog::CatalogEntry;

/// Run the algorithm for the current mode. Returns `false` when the
/// preconditions are unmet or the result falls out of range.
pub(crate) fn run_mode(t: &mut DetailedTiming) -> bool {
    t.native = false;
    match t.mode() {
        TimingMode::Manual => true,
        TimingMode::LcdStandard => lcd_standard(t),
        TimingMode::LcdNative => lcd_native(t),
        TimingMode::LcdReduced => lcd_reduced(t),
        TimingMode::CrtStandard => crt_standard(t),
        TimingMode::OldStandard => old_standard(t),
    }
}

fn lcd_standard(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    t.h_polarity = Polarity::Positive;
    t.v_polarity = Polarity::Negative;
    if let Some(entry) =
        catalog::lookup(catalog::LCD_STANDARD, t.h_active, t.v_active, t.interlaced, t.v_rate)
    {
        apply_entry(t, entry);
    } else {
        settle_with(t, cvt::apply_cvtrb);
    }
    finish_rates(t)
}

fn lcd_native(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    t.h_polarity = Polarity::Positive;
    t.v_polarity = Polarity::Negative;
    if let Some(entry) =
        catalog::lookup(catalog::LCD_NATIVE, t.h_active, t.v_active, t.interlaced, t.v_rate)
    {
        apply_entry(t, entry);
        t.native = true;
    } else {
        // No native entry: settle CVT-RB at 60 Hz, then derive the
        // clock for the rate the caller actually asked for.
        let old_v_rate = t.v_rate;
        t.v_rate = 60_000;
        cvt::apply_cvtrb(t);
        t.calc_p_clock_from_v_rate();
        t.calc_actual_v_rate();
        t.v_rate = t.actual_v_rate;
        cvt::apply_cvtrb(t);
        t.v_rate = old_v_rate;
        t.calc_p_clock_from_v_rate();
    }
    finish_rates(t)
}

fn lcd_reduced(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    t.h_polarity = Polarity::Positive;
    t.v_polarity = Polarity::Negative;
    if let Some(entry) =
        catalog::lookup(catalog::LCD_REDUCED, t.h_active, t.v_active, t.interlaced, t.v_rate)
    {
        apply_entry(t, entry);
    } else {
        settle_with(t, cvt::apply_cvtrb);
        reduced::fix_reduced_clock_budget(t);
    }
    finish_rates(t)
}

fn crt_standard(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    t.h_polarity = Polarity::Negative;
    t.v_polarity = Polarity::Positive;
    if let Some(entry) =
        catalog::lookup(catalog::CRT_STANDARD, t.h_active, t.v_active, t.interlaced, t.v_rate)
    {
        apply_entry(t, entry);
    } else {
        settle_with(t, cvt::apply_cvt);
    }
    finish_rates(t)
}

fn old_standard(t: &mut DetailedTiming) -> bool {
    if !t.has_active_and_rate() {
        return false;
    }
    t.h_polarity = Polarity::Negative;
    t.v_polarity = Polarity::Positive;
    if let Some(entry) =
        catalog::lookup(catalog::OLD_STANDARD, t.h_active, t.v_active, t.interlaced, t.v_rate)
    {
        apply_entry(t, entry);
    } else {
        settle_with(t, gtf::apply_gtf);
    }
    finish_rates(t)
}

/// Copy a catalog entry's porches and polarities, then re-derive the
/// blanking, totals, and the v-rate clock.
fn apply_entry(t: &mut DetailedTiming, entry: &CatalogEntry) {
    t.h_front = entry.h_front;
    t.h_sync = entry.h_sync;
    t.h_back = entry.h_back;
    t.v_front = entry.v_front;
    t.v_sync = entry.v_sync;
    t.v_back = entry.v_back;
    t.h_polarity = entry.h_polarity;
    t.v_polarity = entry.v_polarity;
    t.recompute_blanking_and_clock();
}

/// Run a formula, re-run it at the rate the derived clock actually
/// produces, and restore the caller's target rate.
fn settle_with(t: &mut DetailedTiming, formula: fn(&mut DetailedTiming) -> bool) {
    let old_v_rate = t.v_rate;
    formula(t);
    t.calc_p_clock_from_v_rate();
    t.calc_actual_v_rate();
    t.v_rate = t.actual_v_rate;
    formula(t);
    t.calc_p_clock_from_v_rate();
    t.v_rate = old_v_rate;
}

/// Close the rate group off the derived clock.
fn finish_rates(t: &mut DetailedTiming) -> bool {
    t.calc_actual_v_rate();
    t.calc_actual_h_rate();
    t.h_rate = t.actual_h_rate;
    t.rates_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayClass;

    fn auto(class: DisplayClass, mode: TimingMode, h: i64, v: i64, rate: i64) -> DetailedTiming {
        let mut t = DetailedTiming::new(class);
        t.set_h_active(h);
        t.set_v_active(v);
        t.set_mode(mode);
        t.set_v_rate(rate);
        t
    }

    #[test]
    fn lcd_standard_prefers_the_catalog() {
        let t = auto(DisplayClass::Lcd, TimingMode::LcdStandard, 1920, 1080, 60_000);
        assert_eq!(t.h_front(), Some(88));
        assert_eq!(t.h_sync(), Some(44));
        assert_eq!(t.h_back(), Some(148));
        assert_eq!(t.v_front(), Some(4));
        assert_eq!(t.v_sync(), Some(5));
        assert_eq!(t.v_back(), Some(36));
        assert_eq!(t.h_total(), Some(2200));
        assert_eq!(t.v_total(), Some(1125));
        assert_eq!(t.p_clock(), Some(14_850));
        assert_eq!(t.actual_v_rate(), Some(60_000));
        assert_eq!(t.actual_h_rate(), Some(67_500));
        assert_eq!(t.h_rate(), Some(67_500));
        assert_eq!(t.h_polarity(), Polarity::Positive);
        assert_eq!(t.v_polarity(), Polarity::Negative);
    }

    #[test]
    fn lcd_standard_falls_back_to_settled_cvtrb() {
        // 1024x768 has no catalog entry.
        let t = auto(DisplayClass::Lcd, TimingMode::LcdStandard, 1024, 768, 60_000);
        assert_eq!(t.h_front(), Some(48));
        assert_eq!(t.h_sync(), Some(32));
        assert_eq!(t.h_back(), Some(80));
        assert_eq!(t.v_front(), Some(3));
        assert_eq!(t.v_sync(), Some(4));
        assert_eq!(t.v_back(), Some(15));
        assert_eq!(t.p_clock(), Some(5_613));
        // The target survives; the achieved rate is honest about the
        // rounding.
        assert_eq!(t.v_rate(), Some(60_000));
        assert_eq!(t.actual_v_rate(), Some(60_008));
        assert_eq!(t.h_rate(), Some(47_407));
    }

    #[test]
    fn lcd_native_matches_on_geometry_alone() {
        let t = auto(DisplayClass::Lcd, TimingMode::LcdNative, 1366, 768, 85_000);
        assert!(t.is_native());
        assert_eq!(t.h_sync(), Some(143));
        assert_eq!(t.h_total(), Some(1792));
        assert_eq!(t.v_total(), Some(798));
        assert_eq!(t.p_clock(), Some(12_156));
    }

    #[test]
    fn native_flag_clears_when_the_mode_changes() {
        let mut t = auto(DisplayClass::Lcd, TimingMode::LcdNative, 1366, 768, 60_000);
        assert!(t.is_native());
        t.set_mode(TimingMode::LcdStandard);
        assert!(!t.is_native());
    }

    #[test]
    fn lcd_reduced_keeps_cvtrb_at_moderate_rates() {
        let t = auto(DisplayClass::Lcd, TimingMode::LcdReduced, 1920, 1080, 60_000);
        assert_eq!(t.h_front(), Some(48));
        assert_eq!(t.h_sync(), Some(32));
        assert_eq!(t.h_back(), Some(80));
        assert_eq!(t.v_back(), Some(23));
        assert_eq!(t.h_total(), Some(2080));
        assert_eq!(t.v_total(), Some(1111));
        assert_eq!(t.p_clock(), Some(13_866));
        assert_eq!(t.actual_v_rate(), Some(60_003));
    }

    #[test]
    fn crt_standard_settles_cvt() {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(600);
        t.set_v_active(240);
        t.set_interlaced(true);
        t.set_mode(TimingMode::CrtStandard);
        t.set_v_rate(60_000);
        assert_eq!(t.h_front(), Some(16));
        assert_eq!(t.h_sync(), Some(56));
        assert_eq!(t.h_back(), Some(72));
        assert_eq!(t.v_front(), Some(3));
        assert_eq!(t.v_sync(), Some(7));
        assert_eq!(t.v_back(), Some(6));
        // The settled clock overrides the formula's quantized one.
        assert_eq!(t.p_clock(), Some(1_146));
        assert_eq!(t.actual_v_rate(), Some(60_051));
        assert_eq!(t.h_polarity(), Polarity::Negative);
        assert_eq!(t.v_polarity(), Polarity::Positive);
    }

    #[test]
    fn old_standard_wipes_extreme_width() {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(65_536);
        t.set_v_active(1);
        t.set_mode(TimingMode::OldStandard);
        assert!(!t.set_v_rate(60_000));
        assert_eq!(t.h_front(), None);
        assert_eq!(t.p_clock(), None);
        // The target rate survives the wipe.
        assert_eq!(t.v_rate(), Some(60_000));
    }

    #[test]
    fn crt_standard_closes_at_the_rate_floor() {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(640);
        t.set_v_active(1);
        t.set_mode(TimingMode::CrtStandard);
        assert!(t.set_v_rate(5));
        // The clock clamps to its minimum and the achieved rate is
        // honest about the mismatch.
        assert_eq!(t.p_clock(), Some(1));
        assert_eq!(t.actual_v_rate(), Some(625));
        assert_eq!(t.h_rate(), Some(12));
    }

    #[test]
    fn range_extremes_close_or_wipe_cleanly() {
        let modes = [
            TimingMode::LcdStandard,
            TimingMode::LcdNative,
            TimingMode::LcdReduced,
            TimingMode::CrtStandard,
            TimingMode::OldStandard,
        ];
        let corners = [
            (640, 480, 1),
            (640, 480, 10_000_000),
            (65_536, 1, 60_000),
            (65_536, 65_536, 60_000),
        ];
        for mode in modes {
            for (h, v, rate) in corners {
                let t = auto(DisplayClass::Lcd, mode, h, v, rate);
                assert_eq!(t.v_rate(), Some(rate), "{mode} {h}x{v}@{rate}");
                // Either the whole rate group closed or it was wiped.
                assert_eq!(
                    t.p_clock().is_some(),
                    t.actual_v_rate().is_some(),
                    "{mode} {h}x{v}@{rate}"
                );
            }
        }
    }

    #[test]
    fn old_standard_settles_gtf() {
        let t = auto(DisplayClass::Crt, TimingMode::OldStandard, 640, 480, 60_000);
        assert_eq!(t.h_front(), Some(16));
        assert_eq!(t.h_sync(), Some(64));
        assert_eq!(t.h_back(), Some(80));
        assert_eq!(t.v_front(), Some(1));
        assert_eq!(t.v_sync(), Some(3));
        assert_eq!(t.v_back(), Some(13));
        assert_eq!(t.p_clock(), Some(2_386));
        assert_eq!(t.actual_v_rate(), Some(60_010));
        assert_eq!(t.h_polarity(), Polarity::Negative);
        assert_eq!(t.v_polarity(), Polarity::Positive);
    }
}
