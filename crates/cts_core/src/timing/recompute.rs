//! Dependent-field derivation.
//!
//! One marker per triad records which member the caller supplied last;
//! `update` derives the other two and propagates into the clock/rate
//! group. Each `calc_*` helper wipes its own field to the unset sentinel
//! when the result falls outside the current legal range, so a failed
//! derivation never leaves a stale value behind.

use crate::algorithms;
use crate::limits::UNSET;
use crate::models::{PorchAnchor, RateAnchor};

use super::state::DetailedTiming;

impl DetailedTiming {
    /// Re-derive every dependent field from the anchored members.
    ///
    /// In an automatic mode this runs the mode's algorithm instead; if
    /// the algorithm refuses (preconditions unmet or result out of
    /// range), all derived fields are wiped and `false` is returned.
    pub(crate) fn update(&mut self) -> bool {
        if self.mode.is_automatic() {
            if !algorithms::run_mode(self) {
                tracing::debug!(mode = %self.mode, "automatic timing failed, wiping derived fields");
                self.wipe_derived();
                return false;
            }
            return true;
        }

        let mut ok = match self.h_anchor {
            PorchAnchor::Back => {
                let a = self.calc_h_blank();
                a & self.calc_h_total()
            }
            PorchAnchor::Blank => {
                let a = self.calc_h_back_from_blank();
                a & self.calc_h_total()
            }
            PorchAnchor::Total => {
                let a = self.calc_h_back_from_total();
                a & self.calc_h_blank()
            }
        };
        ok &= match self.v_anchor {
            PorchAnchor::Back => {
                let a = self.calc_v_blank();
                a & self.calc_v_total()
            }
            PorchAnchor::Blank => {
                let a = self.calc_v_back_from_blank();
                a & self.calc_v_total()
            }
            PorchAnchor::Total => {
                let a = self.calc_v_back_from_total();
                a & self.calc_v_blank()
            }
        };
        ok &= match self.rate_anchor {
            RateAnchor::VRate => {
                let a = self.calc_p_clock_from_v_rate()
                    & self.calc_actual_v_rate()
                    & self.calc_actual_h_rate();
                self.h_rate = self.actual_h_rate;
                a
            }
            RateAnchor::HRate => {
                let a = self.calc_p_clock_from_h_rate()
                    & self.calc_actual_v_rate()
                    & self.calc_actual_h_rate();
                self.v_rate = self.actual_v_rate;
                a
            }
            RateAnchor::Clock => {
                let a = self.calc_actual_v_rate() & self.calc_actual_h_rate();
                self.v_rate = self.actual_v_rate;
                self.h_rate = self.actual_h_rate;
                a
            }
        };
        ok
    }

    /// Wipe everything an automatic mode derives. Caller-supplied active
    /// sizes, blanking values, and the target vertical rate survive.
    fn wipe_derived(&mut self) {
        self.h_front = UNSET;
        self.h_sync = UNSET;
        self.h_back = UNSET;
        self.h_total = UNSET;
        self.v_front = UNSET;
        self.v_sync = UNSET;
        self.v_back = UNSET;
        self.v_total = UNSET;
        self.p_clock = UNSET;
        self.h_rate = UNSET;
        self.actual_v_rate = UNSET;
        self.actual_h_rate = UNSET;
    }

    /// Rebuild blanking, totals, and the v-rate-derived clock after an
    /// algorithm changed porch fields in place.
    pub(crate) fn recompute_blanking_and_clock(&mut self) {
        self.calc_h_blank();
        self.calc_h_total();
        self.calc_v_blank();
        self.calc_v_total();
        self.calc_p_clock_from_v_rate();
    }

    pub(crate) fn interlace_term(&self) -> i64 {
        self.interlaced as i64
    }

    // ---- derivations ----

    pub(crate) fn calc_h_blank(&mut self) -> bool {
        if !(self.h_front_supported() && self.h_sync_supported() && self.h_back_supported()) {
            self.h_blank = UNSET;
            return false;
        }
        self.h_blank = self.h_front + self.h_sync + self.h_back;
        if !self.h_blank_supported() {
            self.h_blank = UNSET;
            return false;
        }
        true
    }

    pub(crate) fn calc_h_total(&mut self) -> bool {
        if !(self.h_active_supported()
            && self.h_front_supported()
            && self.h_sync_supported()
            && self.h_back_supported())
        {
            self.h_total = UNSET;
            return false;
        }
        self.h_total = self.h_active + self.h_front + self.h_sync + self.h_back;
        if !self.h_total_supported() {
            self.h_total = UNSET;
            return false;
        }
        true
    }

    fn calc_h_back_from_blank(&mut self) -> bool {
        if !(self.h_blank_supported() && self.h_front_supported() && self.h_sync_supported()) {
            self.h_back = UNSET;
            return false;
        }
        self.h_back = self.h_blank - self.h_front - self.h_sync;
        if !self.h_back_supported() {
            self.h_back = UNSET;
            return false;
        }
        true
    }

    fn calc_h_back_from_total(&mut self) -> bool {
        if !(self.h_total_supported()
            && self.h_active_supported()
            && self.h_front_supported()
            && self.h_sync_supported())
        {
            self.h_back = UNSET;
            return false;
        }
        self.h_back = self.h_total - self.h_active - self.h_front - self.h_sync;
        if !self.h_back_supported() {
            self.h_back = UNSET;
            return false;
        }
        true
    }

    pub(crate) fn calc_v_blank(&mut self) -> bool {
        if !(self.v_front_supported() && self.v_sync_supported() && self.v_back_supported()) {
            self.v_blank = UNSET;
            return false;
        }
        self.v_blank = self.v_front + self.v_sync + self.v_back;
        if !self.v_blank_supported() {
            self.v_blank = UNSET;
            return false;
        }
        true
    }

    pub(crate) fn calc_v_total(&mut self) -> bool {
        if !(self.v_active_supported()
            && self.v_front_supported()
            && self.v_sync_supported()
            && self.v_back_supported())
        {
            self.v_total = UNSET;
            return false;
        }
        self.v_total = self.v_active + self.v_front + self.v_sync + self.v_back;
        if !self.v_total_supported() {
            self.v_total = UNSET;
            return false;
        }
        true
    }

    fn calc_v_back_from_blank(&mut self) -> bool {
        if !(self.v_blank_supported() && self.v_front_supported() && self.v_sync_supported()) {
            self.v_back = UNSET;
            return false;
        }
        self.v_back = self.v_blank - self.v_front - self.v_sync;
        if !self.v_back_supported() {
            self.v_back = UNSET;
            return false;
        }
        true
    }

    fn calc_v_back_from_total(&mut self) -> bool {
        if !(self.v_total_supported()
            && self.v_active_supported()
            && self.v_front_supported()
            && self.v_sync_supported())
        {
            self.v_back = UNSET;
            return false;
        }
        self.v_back = self.v_total - self.v_active - self.v_front - self.v_sync;
        if !self.v_back_supported() {
            self.v_back = UNSET;
            return false;
        }
        true
    }

    /// Clock from the target vertical rate, rounded up so the achieved
    /// rate never undershoots the target.
    pub(crate) fn calc_p_clock_from_v_rate(&mut self) -> bool {
        if !(self.v_rate_supported() && self.h_total_supported() && self.v_total_supported()) {
            self.p_clock = UNSET;
            return false;
        }
        let frame = self.h_total * (self.v_total * 2 + self.interlace_term());
        self.p_clock = (self.v_rate * frame + 19_999_999) / 20_000_000;
        if !self.p_clock_supported() {
            self.p_clock = UNSET;
            return false;
        }
        true
    }

    /// Clock from the target horizontal rate, rounded up.
    pub(crate) fn calc_p_clock_from_h_rate(&mut self) -> bool {
        if !(self.h_rate_supported() && self.h_total_supported()) {
            self.p_clock = UNSET;
            return false;
        }
        self.p_clock = (self.h_rate * self.h_total + 9_999) / 10_000;
        if !self.p_clock_supported() {
            self.p_clock = UNSET;
            return false;
        }
        true
    }

    /// Clock from the target vertical rate, truncated to a 25-unit
    /// (0.25 MHz) step as the CVT family specifies.
    pub(crate) fn calc_p_clock_quantized(&mut self) -> bool {
        if !(self.v_rate_supported() && self.h_total_supported() && self.v_total_supported()) {
            self.p_clock = UNSET;
            return false;
        }
        let frame = self.h_total * (self.v_total * 2 + self.interlace_term());
        self.p_clock = self.v_rate * frame / 20_000_000 / 25 * 25;
        if !self.p_clock_supported() {
            self.p_clock = UNSET;
            return false;
        }
        true
    }

    pub(crate) fn calc_actual_v_rate(&mut self) -> bool {
        if !(self.p_clock_supported() && self.h_total_supported() && self.v_total_supported()) {
            self.actual_v_rate = UNSET;
            return false;
        }
        self.actual_v_rate =
            self.p_clock * 20_000_000 / self.h_total / (self.v_total * 2 + self.interlace_term());
        if !self.actual_v_rate_supported() {
            self.actual_v_rate = UNSET;
            return false;
        }
        true
    }

    pub(crate) fn calc_actual_h_rate(&mut self) -> bool {
        if !(self.p_clock_supported() && self.h_total_supported()) {
            self.actual_h_rate = UNSET;
            return false;
        }
        self.actual_h_rate = self.p_clock * 10_000 / self.h_total;
        if !self.actual_h_rate_supported() {
            self.actual_h_rate = UNSET;
            return false;
        }
        true
    }

    // ---- range predicates ----

    pub(crate) fn h_active_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_active..=l.max_h_active).contains(&self.h_active)
    }

    pub(crate) fn h_front_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_front..=l.max_h_front).contains(&self.h_front)
    }

    pub(crate) fn h_sync_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_sync..=l.max_h_sync).contains(&self.h_sync)
    }

    pub(crate) fn h_back_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_back..=l.max_h_back(self.h_front, self.h_sync)).contains(&self.h_back)
    }

    pub(crate) fn h_blank_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_blank(self.h_front, self.h_sync)..=l.max_h_blank).contains(&self.h_blank)
    }

    pub(crate) fn h_total_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_total(self.h_active, self.h_front, self.h_sync)
            ..=l.max_h_total(self.h_active))
            .contains(&self.h_total)
    }

    pub(crate) fn v_active_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_active..=l.max_v_active).contains(&self.v_active)
    }

    pub(crate) fn v_front_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_front..=l.max_v_front).contains(&self.v_front)
    }

    pub(crate) fn v_sync_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_sync..=l.max_v_sync).contains(&self.v_sync)
    }

    pub(crate) fn v_back_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_back..=l.max_v_back(self.v_front, self.v_sync)).contains(&self.v_back)
    }

    pub(crate) fn v_blank_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_blank(self.v_front, self.v_sync)..=l.max_v_blank).contains(&self.v_blank)
    }

    pub(crate) fn v_total_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_total(self.v_active, self.v_front, self.v_sync)
            ..=l.max_v_total(self.v_active))
            .contains(&self.v_total)
    }

    pub(crate) fn v_rate_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_rate..=l.max_v_rate).contains(&self.v_rate)
    }

    pub(crate) fn h_rate_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_rate..=l.max_h_rate).contains(&self.h_rate)
    }

    pub(crate) fn p_clock_supported(&self) -> bool {
        let l = self.limits();
        (l.min_p_clock..=l.max_p_clock).contains(&self.p_clock)
    }

    pub(crate) fn actual_v_rate_supported(&self) -> bool {
        let l = self.limits();
        (l.min_v_rate..=l.max_v_rate).contains(&self.actual_v_rate)
    }

    pub(crate) fn actual_h_rate_supported(&self) -> bool {
        let l = self.limits();
        (l.min_h_rate..=l.max_h_rate).contains(&self.actual_h_rate)
    }

    /// Preconditions shared by every timing algorithm.
    pub(crate) fn has_active_and_rate(&self) -> bool {
        self.h_active_supported() && self.v_active_supported() && self.v_rate_supported()
    }

    /// Whether the whole rate/clock group closed within range.
    pub(crate) fn rates_supported(&self) -> bool {
        self.v_rate_supported()
            && self.h_rate_supported()
            && self.p_clock_supported()
            && self.actual_v_rate_supported()
            && self.actual_h_rate_supported()
    }
}
