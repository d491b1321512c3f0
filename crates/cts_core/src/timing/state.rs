//! The timing parameter set and its setters.

use crate::limits::{self, Limits, UNSET};
use crate::models::{DisplayClass, Polarity, PorchAnchor, RateAnchor, TimingMode};

use super::error::{TimingError, TimingResult};

/// A complete scan-timing parameter set for one display mode.
///
/// Fixed-point unit conventions:
/// - horizontal fields are pixels, vertical fields are lines
/// - `v_rate` and `actual_v_rate` are millihertz (60000 = 60 Hz)
/// - `h_rate` and `actual_h_rate` are hertz, i.e. thousandths of a kHz
/// - `p_clock` is hundredths of a MHz (14850 = 148.50 MHz)
///
/// All fields start unset; public getters return `Option<i64>`. Mutation
/// goes through the named setters, each of which returns `true` when the
/// state is consistent afterwards and `false` when the affected derived
/// fields had to be wiped.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedTiming {
    pub(crate) class: DisplayClass,
    pub(crate) mode: TimingMode,
    pub(crate) h_anchor: PorchAnchor,
    pub(crate) v_anchor: PorchAnchor,
    pub(crate) rate_anchor: RateAnchor,

    pub(crate) h_active: i64,
    pub(crate) h_front: i64,
    pub(crate) h_sync: i64,
    pub(crate) h_back: i64,
    pub(crate) h_blank: i64,
    pub(crate) h_total: i64,
    pub(crate) h_polarity: Polarity,

    pub(crate) v_active: i64,
    pub(crate) v_front: i64,
    pub(crate) v_sync: i64,
    pub(crate) v_back: i64,
    pub(crate) v_blank: i64,
    pub(crate) v_total: i64,
    pub(crate) v_polarity: Polarity,

    // Shadow geometry for the alternate progressive/interlaced pairing.
    pub(crate) v_active_pair: i64,
    pub(crate) v_front_pair: i64,
    pub(crate) v_sync_pair: i64,
    pub(crate) v_back_pair: i64,
    pub(crate) v_blank_pair: i64,
    pub(crate) v_total_pair: i64,
    pub(crate) v_rate_pair: i64,

    pub(crate) v_rate: i64,
    pub(crate) h_rate: i64,
    pub(crate) p_clock: i64,
    pub(crate) actual_v_rate: i64,
    pub(crate) actual_h_rate: i64,

    pub(crate) interlaced: bool,
    pub(crate) native: bool,
    pub(crate) stereo: bool,

    snapshot: Option<Box<DetailedTiming>>,
}

fn opt(value: i64) -> Option<i64> {
    limits::is_set(value).then_some(value)
}

impl DetailedTiming {
    /// Create a fully unset timing for the given display class.
    pub fn new(class: DisplayClass) -> Self {
        Self {
            class,
            mode: TimingMode::Manual,
            h_anchor: PorchAnchor::Back,
            v_anchor: PorchAnchor::Back,
            rate_anchor: RateAnchor::VRate,
            h_active: UNSET,
            h_front: UNSET,
            h_sync: UNSET,
            h_back: UNSET,
            h_blank: UNSET,
            h_total: UNSET,
            h_polarity: Polarity::Negative,
            v_active: UNSET,
            v_front: UNSET,
            v_sync: UNSET,
            v_back: UNSET,
            v_blank: UNSET,
            v_total: UNSET,
            v_polarity: Polarity::Negative,
            v_active_pair: UNSET,
            v_front_pair: UNSET,
            v_sync_pair: UNSET,
            v_back_pair: UNSET,
            v_blank_pair: UNSET,
            v_total_pair: UNSET,
            v_rate_pair: UNSET,
            v_rate: UNSET,
            h_rate: UNSET,
            p_clock: UNSET,
            actual_v_rate: UNSET,
            actual_h_rate: UNSET,
            interlaced: false,
            native: false,
            stereo: false,
            snapshot: None,
        }
    }

    pub(crate) fn limits(&self) -> &'static Limits {
        self.class.limits()
    }

    // ---- getters ----

    pub fn display_class(&self) -> DisplayClass {
        self.class
    }

    pub fn mode(&self) -> TimingMode {
        self.mode
    }

    pub fn is_interlaced(&self) -> bool {
        self.interlaced
    }

    /// Whether the current geometry came from the native-mode catalog.
    pub fn is_native(&self) -> bool {
        self.native
    }

    pub fn is_stereo(&self) -> bool {
        self.stereo
    }

    pub fn h_porch_anchor(&self) -> PorchAnchor {
        self.h_anchor
    }

    pub fn v_porch_anchor(&self) -> PorchAnchor {
        self.v_anchor
    }

    pub fn rate_anchor(&self) -> RateAnchor {
        self.rate_anchor
    }

    pub fn h_active(&self) -> Option<i64> {
        opt(self.h_active)
    }

    pub fn h_front(&self) -> Option<i64> {
        opt(self.h_front)
    }

    pub fn h_sync(&self) -> Option<i64> {
        opt(self.h_sync)
    }

    pub fn h_back(&self) -> Option<i64> {
        opt(self.h_back)
    }

    pub fn h_blank(&self) -> Option<i64> {
        opt(self.h_blank)
    }

    pub fn h_total(&self) -> Option<i64> {
        opt(self.h_total)
    }

    pub fn h_polarity(&self) -> Polarity {
        self.h_polarity
    }

    pub fn v_active(&self) -> Option<i64> {
        opt(self.v_active)
    }

    pub fn v_front(&self) -> Option<i64> {
        opt(self.v_front)
    }

    pub fn v_sync(&self) -> Option<i64> {
        opt(self.v_sync)
    }

    pub fn v_back(&self) -> Option<i64> {
        opt(self.v_back)
    }

    pub fn v_blank(&self) -> Option<i64> {
        opt(self.v_blank)
    }

    pub fn v_total(&self) -> Option<i64> {
        opt(self.v_total)
    }

    pub fn v_polarity(&self) -> Polarity {
        self.v_polarity
    }

    pub fn v_rate(&self) -> Option<i64> {
        opt(self.v_rate)
    }

    pub fn h_rate(&self) -> Option<i64> {
        opt(self.h_rate)
    }

    pub fn p_clock(&self) -> Option<i64> {
        opt(self.p_clock)
    }

    pub fn actual_v_rate(&self) -> Option<i64> {
        opt(self.actual_v_rate)
    }

    pub fn actual_h_rate(&self) -> Option<i64> {
        opt(self.actual_h_rate)
    }

    // ---- setters ----

    /// Switch the timing mode and re-derive the parameter set.
    pub fn set_mode(&mut self, mode: TimingMode) -> bool {
        self.mode = mode;
        let ok = self.update();
        self.sync_interlace_pair();
        self.sync_interlace_rate();
        ok
    }

    pub fn set_h_active(&mut self, value: i64) -> bool {
        self.h_active = value;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_front(&mut self, value: i64) -> bool {
        self.h_front = value;
        self.mode = TimingMode::Manual;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_sync(&mut self, value: i64) -> bool {
        self.h_sync = value;
        self.mode = TimingMode::Manual;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_back(&mut self, value: i64) -> bool {
        self.h_back = value;
        self.mode = TimingMode::Manual;
        self.h_anchor = PorchAnchor::Back;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_blank(&mut self, value: i64) -> bool {
        self.h_blank = value;
        self.mode = TimingMode::Manual;
        self.h_anchor = PorchAnchor::Blank;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_total(&mut self, value: i64) -> bool {
        self.h_total = value;
        self.mode = TimingMode::Manual;
        self.h_anchor = PorchAnchor::Total;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_h_polarity(&mut self, value: Polarity) -> bool {
        self.h_polarity = value;
        self.mode = TimingMode::Manual;
        true
    }

    pub fn set_v_active(&mut self, value: i64) -> bool {
        self.v_active = value;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_front(&mut self, value: i64) -> bool {
        self.v_front = value;
        self.mode = TimingMode::Manual;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_sync(&mut self, value: i64) -> bool {
        self.v_sync = value;
        self.mode = TimingMode::Manual;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_back(&mut self, value: i64) -> bool {
        self.v_back = value;
        self.mode = TimingMode::Manual;
        self.v_anchor = PorchAnchor::Back;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_blank(&mut self, value: i64) -> bool {
        self.v_blank = value;
        self.mode = TimingMode::Manual;
        self.v_anchor = PorchAnchor::Blank;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_total(&mut self, value: i64) -> bool {
        self.v_total = value;
        self.mode = TimingMode::Manual;
        self.v_anchor = PorchAnchor::Total;
        let ok = self.update();
        self.sync_interlace_pair();
        ok
    }

    pub fn set_v_polarity(&mut self, value: Polarity) -> bool {
        self.v_polarity = value;
        self.mode = TimingMode::Manual;
        true
    }

    /// Set the target vertical refresh rate in millihertz.
    ///
    /// In manual mode this makes the vertical rate authoritative for the
    /// rate triad; in an automatic mode the mode's algorithm decides.
    pub fn set_v_rate(&mut self, value: i64) -> bool {
        self.v_rate = value;
        if self.mode == TimingMode::Manual {
            self.rate_anchor = RateAnchor::VRate;
        }
        let ok = self.update();
        self.sync_interlace_rate();
        ok
    }

    /// Set the horizontal scan rate in hertz (thousandths of a kHz).
    pub fn set_h_rate(&mut self, value: i64) -> bool {
        self.h_rate = value;
        self.rate_anchor = RateAnchor::HRate;
        let ok = self.update();
        self.sync_interlace_rate();
        ok
    }

    /// Set the pixel clock in hundredths of a MHz.
    pub fn set_p_clock(&mut self, value: i64) -> bool {
        self.p_clock = value;
        self.rate_anchor = RateAnchor::Clock;
        let ok = self.update();
        self.sync_interlace_rate();
        ok
    }

    /// Toggle interlacing, swapping the live vertical geometry with its
    /// shadow pair. Toggling twice restores the original values; setting
    /// the flag to its current value is a no-op.
    pub fn set_interlaced(&mut self, value: bool) -> bool {
        if value == self.interlaced {
            return true;
        }
        std::mem::swap(&mut self.v_active, &mut self.v_active_pair);
        std::mem::swap(&mut self.v_front, &mut self.v_front_pair);
        std::mem::swap(&mut self.v_sync, &mut self.v_sync_pair);
        std::mem::swap(&mut self.v_back, &mut self.v_back_pair);
        std::mem::swap(&mut self.v_blank, &mut self.v_blank_pair);
        std::mem::swap(&mut self.v_total, &mut self.v_total_pair);
        std::mem::swap(&mut self.v_rate, &mut self.v_rate_pair);
        self.interlaced = value;
        self.update()
    }

    pub fn set_stereo(&mut self, value: bool) -> bool {
        self.stereo = value;
        true
    }

    // ---- interlace pair synchronization ----

    /// Refresh the shadow geometry that `set_interlaced` will swap in.
    ///
    /// For a handful of broadcast geometries the pairing is a curated
    /// table entry (540p <-> 1080i); otherwise the active line count is
    /// doubled or halved and the porches carry over.
    pub(crate) fn sync_interlace_pair(&mut self) {
        self.v_active_pair = self.v_active;
        self.v_front_pair = self.v_front;
        self.v_sync_pair = self.v_sync;
        self.v_back_pair = self.v_back;

        let max_v_active = self.limits().max_v_active;
        if self.v_active_supported() && self.interlaced {
            if self.v_active == 540 && self.v_front == 2 && self.v_sync == 5 && self.v_back == 15 {
                self.v_active_pair = 1080;
                self.v_front_pair = 4;
                self.v_sync_pair = 5;
                self.v_back_pair = 36;
            } else if self.v_active < max_v_active / 2 {
                self.v_active_pair = self.v_active * 2;
            }
        } else if self.v_active_supported() && self.v_active % 2 == 0 {
            if self.v_active == 1080 && self.v_front == 4 && self.v_sync == 5 && self.v_back == 36 {
                self.v_active_pair = 540;
                self.v_front_pair = 2;
                self.v_sync_pair = 5;
                self.v_back_pair = 15;
            } else if self.h_active_supported() {
                let tv_shaped = self.v_active * 125 > self.h_active * 51
                    || self.h_active == 1440
                    || self.h_active == 2880;
                if tv_shaped
                    && ((472..=488).contains(&self.v_active)
                        || (566..=586).contains(&self.v_active))
                {
                    self.v_active_pair = self.v_active / 2;
                }
            } else if (472..=488).contains(&self.v_active) || self.v_active >= 566 {
                self.v_active_pair = self.v_active / 2;
            }
        }

        self.v_blank_pair = self.v_front_pair + self.v_sync_pair + self.v_back_pair;
        self.v_total_pair = self.v_active_pair + self.v_blank_pair;
    }

    /// Refresh the shadow vertical rate for the interlace pairing.
    pub(crate) fn sync_interlace_rate(&mut self) {
        self.v_rate_pair = self.v_rate;
        if self.v_rate_supported() && !self.interlaced && self.v_rate < 45_000 {
            self.v_rate_pair = self.v_rate * 2;
        }
    }

    // ---- bootstrap, snapshot, validation ----

    /// Bootstrap a timing from active size and an approximate vertical
    /// rate, then snap the rate to the cleanest value the derived clock
    /// can actually produce.
    ///
    /// Snap order: nearest 1 Hz; if that misses and the rounded rate sits
    /// on a 24 or 30 Hz cadence, the NTSC-style x1000/1001 adjustment;
    /// nearest 0.1 Hz; finally the unrounded actual rate.
    pub fn start(&mut self) -> bool {
        if !self.update() {
            return false;
        }
        if !limits::is_set(self.actual_v_rate) {
            return false;
        }
        let actual = self.actual_v_rate;

        let whole = (actual + 500) / 1000 * 1000;
        if self.try_snap_rate(whole) {
            self.sync_interlace_rate();
            return true;
        }
        if (whole / 1000) % 24 == 0 || (whole / 1000) % 30 == 0 {
            let fractional = whole * 1000 / 1001;
            if self.try_snap_rate(fractional) {
                tracing::debug!(rate = fractional, "snapped to 1000/1001 cadence rate");
                self.sync_interlace_rate();
                return true;
            }
        }
        let tenth = (actual + 50) / 100 * 100;
        if self.try_snap_rate(tenth) {
            self.sync_interlace_rate();
            return true;
        }
        self.try_snap_rate(actual);
        self.sync_interlace_rate();
        true
    }

    /// Set the vertical rate to `rate`, rebuild the clock and the actual
    /// rates from it, and report whether the loop closed exactly.
    fn try_snap_rate(&mut self, rate: i64) -> bool {
        self.v_rate = rate;
        self.calc_p_clock_from_v_rate();
        self.calc_actual_v_rate();
        self.calc_actual_h_rate();
        self.h_rate = self.actual_h_rate;
        self.actual_v_rate == rate
    }

    /// Capture a restore point for [`DetailedTiming::reset`].
    pub fn update_reset(&mut self) -> bool {
        let mut snap = self.clone();
        snap.snapshot = None;
        self.snapshot = Some(Box::new(snap));
        true
    }

    /// Restore the last captured snapshot and re-run [`DetailedTiming::start`].
    ///
    /// Returns `false` if no snapshot was ever captured. The snapshot is
    /// kept, so repeated resets restore the same point.
    pub fn reset(&mut self) -> bool {
        let Some(snap) = self.snapshot.take() else {
            return false;
        };
        let keep = snap.clone();
        *self = *snap;
        self.snapshot = Some(keep);
        self.start()
    }

    /// Check every field against its current legal range and report the
    /// first offender.
    pub fn validate(&self) -> TimingResult<()> {
        let l = self.limits();
        check("h_active", self.h_active, l.min_h_active, l.max_h_active)?;
        check("h_front", self.h_front, l.min_h_front, l.max_h_front)?;
        check("h_sync", self.h_sync, l.min_h_sync, l.max_h_sync)?;
        check(
            "h_back",
            self.h_back,
            l.min_h_back,
            l.max_h_back(self.h_front, self.h_sync),
        )?;
        check(
            "h_blank",
            self.h_blank,
            l.min_h_blank(self.h_front, self.h_sync),
            l.max_h_blank,
        )?;
        check(
            "h_total",
            self.h_total,
            l.min_h_total(self.h_active, self.h_front, self.h_sync),
            l.max_h_total(self.h_active),
        )?;
        check("v_active", self.v_active, l.min_v_active, l.max_v_active)?;
        check("v_front", self.v_front, l.min_v_front, l.max_v_front)?;
        check("v_sync", self.v_sync, l.min_v_sync, l.max_v_sync)?;
        check(
            "v_back",
            self.v_back,
            l.min_v_back,
            l.max_v_back(self.v_front, self.v_sync),
        )?;
        check(
            "v_blank",
            self.v_blank,
            l.min_v_blank(self.v_front, self.v_sync),
            l.max_v_blank,
        )?;
        check(
            "v_total",
            self.v_total,
            l.min_v_total(self.v_active, self.v_front, self.v_sync),
            l.max_v_total(self.v_active),
        )?;
        check("v_rate", self.v_rate, l.min_v_rate, l.max_v_rate)?;
        check("h_rate", self.h_rate, l.min_h_rate, l.max_h_rate)?;
        check("p_clock", self.p_clock, l.min_p_clock, l.max_p_clock)?;
        Ok(())
    }
}

fn check(field: &'static str, value: i64, min: i64, max: i64) -> TimingResult<()> {
    if !limits::is_set(value) {
        return Err(TimingError::unset(field));
    }
    if value < min || value > max {
        return Err(TimingError::out_of_range(field, value, min, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cea_1080p60() -> DetailedTiming {
        let mut t = DetailedTiming::new(DisplayClass::Lcd);
        t.set_h_active(1920);
        t.set_v_active(1080);
        t.set_h_front(88);
        t.set_h_sync(44);
        t.set_h_back(148);
        t.set_v_front(4);
        t.set_v_sync(5);
        t.set_v_back(36);
        t.set_v_rate(60_000);
        t
    }

    #[test]
    fn new_is_fully_unset() {
        let t = DetailedTiming::new(DisplayClass::Crt);
        assert_eq!(t.h_active(), None);
        assert_eq!(t.v_total(), None);
        assert_eq!(t.p_clock(), None);
        assert!(t.validate().is_err());
    }

    #[test]
    fn manual_derivation_keeps_identities() {
        let t = cea_1080p60();
        assert_eq!(t.h_blank(), Some(88 + 44 + 148));
        assert_eq!(t.h_total(), Some(1920 + 280));
        assert_eq!(t.v_blank(), Some(4 + 5 + 36));
        assert_eq!(t.v_total(), Some(1080 + 45));
        assert_eq!(t.p_clock(), Some(14_850));
        assert_eq!(t.actual_v_rate(), Some(60_000));
        assert_eq!(t.actual_h_rate(), Some(67_500));
        assert_eq!(t.h_rate(), Some(67_500));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn setters_are_idempotent() {
        let mut once = cea_1080p60();
        once.set_h_back(100);
        let mut twice = cea_1080p60();
        twice.set_h_back(100);
        twice.set_h_back(100);
        assert_eq!(once, twice);

        once.set_interlaced(true);
        twice.set_interlaced(true);
        twice.set_interlaced(true);
        assert_eq!(once, twice);
    }

    #[test]
    fn blank_anchor_derives_back_porch() {
        let mut t = cea_1080p60();
        t.set_h_blank(280);
        assert_eq!(t.h_back(), Some(148));
        assert_eq!(t.h_total(), Some(2200));
    }

    #[test]
    fn total_anchor_derives_back_and_blank() {
        let mut t = cea_1080p60();
        t.set_h_total(2200);
        assert_eq!(t.h_back(), Some(148));
        assert_eq!(t.h_blank(), Some(280));
    }

    #[test]
    fn interlace_toggle_is_an_involution() {
        let before = cea_1080p60();
        let mut t = before.clone();
        t.set_interlaced(true);
        t.set_interlaced(false);
        assert_eq!(t.v_active(), before.v_active());
        assert_eq!(t.v_front(), before.v_front());
        assert_eq!(t.v_sync(), before.v_sync());
        assert_eq!(t.v_back(), before.v_back());
        assert_eq!(t.v_blank(), before.v_blank());
        assert_eq!(t.v_total(), before.v_total());
        assert_eq!(t.v_rate(), before.v_rate());
    }

    #[test]
    fn broadcast_1080p_pairs_with_540p() {
        let t = cea_1080p60();
        // The curated 1080p <-> 540p pairing, reachable by one toggle.
        let mut i = t.clone();
        i.set_interlaced(true);
        assert_eq!(i.v_active(), Some(540));
        assert_eq!(i.v_front(), Some(2));
        assert_eq!(i.v_sync(), Some(5));
        assert_eq!(i.v_back(), Some(15));
    }

    #[test]
    fn automatic_failure_wipes_derived_fields() {
        let mut t = DetailedTiming::new(DisplayClass::Lcd);
        t.set_mode(TimingMode::CrtStandard);
        // No active size yet, so the algorithm must refuse and wipe.
        assert!(!t.set_v_rate(60_000));
        assert_eq!(t.h_front(), None);
        assert_eq!(t.v_total(), None);
        assert_eq!(t.p_clock(), None);
        // The caller-supplied rate survives.
        assert_eq!(t.v_rate(), Some(60_000));
    }

    #[test]
    fn start_keeps_an_exact_rate() {
        let mut t = cea_1080p60();
        assert!(t.start());
        assert_eq!(t.v_rate(), Some(60_000));
        assert_eq!(t.p_clock(), Some(14_850));
    }

    #[test]
    fn start_snaps_ntsc_rate_through_1001_cadence() {
        let mut t = DetailedTiming::new(DisplayClass::Lcd);
        t.set_h_active(720);
        t.set_v_active(480);
        t.set_h_front(16);
        t.set_h_sync(62);
        t.set_h_back(60);
        t.set_v_front(9);
        t.set_v_sync(6);
        t.set_v_back(30);
        t.set_v_rate(59_940);
        assert!(t.start());
        // 59.94 rounds to 60, 60 Hz does not close the loop, the 30 Hz
        // cadence retries 60 * 1000/1001 = 59.94 and that one closes.
        assert_eq!(t.v_rate(), Some(59_940));
        assert_eq!(t.p_clock(), Some(2_700));
        assert_eq!(t.actual_v_rate(), Some(59_940));
    }

    #[test]
    fn reset_requires_a_snapshot() {
        let mut t = cea_1080p60();
        assert!(!t.reset());
        assert!(t.update_reset());
        t.set_h_back(200);
        assert!(t.reset());
        assert_eq!(t.h_back(), Some(148));
        // The snapshot survives the reset.
        t.set_h_back(200);
        assert!(t.reset());
        assert_eq!(t.h_back(), Some(148));
    }

    #[test]
    fn validate_reports_first_offending_field() {
        let mut t = cea_1080p60();
        t.set_v_front(64);
        assert_eq!(
            t.validate(),
            Err(TimingError::out_of_range("v_front", 64, 1, 63))
        );
    }

    #[test]
    fn out_of_range_setter_wipes_downstream() {
        let mut t = cea_1080p60();
        assert!(!t.set_v_front(64));
        assert_eq!(t.v_blank(), None);
        assert_eq!(t.v_total(), None);
        assert_eq!(t.p_clock(), None);
    }
}
