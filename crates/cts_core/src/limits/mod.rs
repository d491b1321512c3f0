//! Validity ranges for timing fields.
//!
//! Global minima/maxima are fixed per display class; the bounds for
//! back porch, blanking, and total depend on the sibling fields already
//! chosen, so those are computed here as pure functions. A clamp helper
//! treats an unset field as equal to its own minimum so the sentinel
//! never leaks into arithmetic.
//!
//! All functions are pure - no I/O, no side effects.

use crate::models::DisplayClass;

/// Sentinel for a field that has not been set or derived yet.
///
/// Sits below every legal range, so range checks reject it naturally.
pub const UNSET: i64 = -2_147_483_647;

/// Whether a field holds a real value.
pub fn is_set(value: i64) -> bool {
    value != UNSET
}

/// Clamp `value` into `[min, max]`, mapping [`UNSET`] to `min`.
pub fn clamp(value: i64, min: i64, max: i64) -> i64 {
    if value == UNSET || value <= min {
        min
    } else if value >= max {
        max
    } else {
        value
    }
}

/// Global field bounds for one display class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_h_active: i64,
    pub max_h_active: i64,
    pub min_h_front: i64,
    pub max_h_front: i64,
    pub min_h_sync: i64,
    pub max_h_sync: i64,
    pub min_h_back: i64,
    pub max_h_back: i64,
    pub min_h_blank: i64,
    pub max_h_blank: i64,
    pub min_h_total: i64,
    pub max_h_total: i64,

    pub min_v_active: i64,
    pub max_v_active: i64,
    pub min_v_front: i64,
    pub max_v_front: i64,
    pub min_v_sync: i64,
    pub max_v_sync: i64,
    pub min_v_back: i64,
    pub max_v_back: i64,
    pub min_v_blank: i64,
    pub max_v_blank: i64,
    pub min_v_total: i64,
    pub max_v_total: i64,

    pub min_v_rate: i64,
    pub max_v_rate: i64,
    pub min_h_rate: i64,
    pub max_h_rate: i64,
    pub min_p_clock: i64,
    pub max_p_clock: i64,
}

/// The one populated range table. Both display classes share it; see
/// DESIGN.md for the decision not to invent a second set of numbers.
pub static STANDARD: Limits = Limits {
    min_h_active: 1,
    max_h_active: 65_536,
    min_h_front: 1,
    max_h_front: 32_768,
    min_h_sync: 1,
    max_h_sync: 65_536,
    min_h_back: 0,
    max_h_back: 65_534,
    min_h_blank: 2,
    max_h_blank: 65_536,
    min_h_total: 3,
    max_h_total: 131_072,

    min_v_active: 1,
    max_v_active: 65_536,
    min_v_front: 1,
    max_v_front: 63,
    min_v_sync: 1,
    max_v_sync: 63,
    min_v_back: 0,
    max_v_back: 65_534,
    min_v_blank: 2,
    max_v_blank: 65_536,
    min_v_total: 3,
    max_v_total: 131_072,

    min_v_rate: 1,
    max_v_rate: 10_000_000,
    min_h_rate: 1,
    max_h_rate: 10_000_000,
    min_p_clock: 1,
    max_p_clock: 16_777_216,
};

impl DisplayClass {
    /// Range table for this display class.
    pub fn limits(&self) -> &'static Limits {
        match self {
            DisplayClass::Crt | DisplayClass::Lcd => &STANDARD,
        }
    }
}

impl Limits {
    /// Largest back porch that still fits inside the maximum blanking
    /// given the front porch and sync width already chosen.
    pub fn max_h_back(&self, h_front: i64, h_sync: i64) -> i64 {
        let front = clamp(h_front, self.min_h_front, self.max_h_front);
        let sync = clamp(h_sync, self.min_h_sync, self.max_h_sync);
        self.max_h_back.min(self.max_h_blank - front - sync)
    }

    /// Smallest blanking that can hold the chosen front porch and sync
    /// width plus the minimum back porch.
    pub fn min_h_blank(&self, h_front: i64, h_sync: i64) -> i64 {
        let front = clamp(h_front, self.min_h_front, self.max_h_front);
        let sync = clamp(h_sync, self.min_h_sync, self.max_h_sync);
        self.min_h_blank.max(front + sync + self.min_h_back)
    }

    /// Smallest total consistent with the chosen active, front, and sync.
    pub fn min_h_total(&self, h_active: i64, h_front: i64, h_sync: i64) -> i64 {
        let active = clamp(h_active, self.min_h_active, self.max_h_active);
        let front = clamp(h_front, self.min_h_front, self.max_h_front);
        let sync = clamp(h_sync, self.min_h_sync, self.max_h_sync);
        self.min_h_total.max(active + front + sync + self.min_h_back)
    }

    /// Largest total consistent with the chosen active size.
    pub fn max_h_total(&self, h_active: i64) -> i64 {
        if h_active < self.min_h_active || h_active > self.max_h_active {
            return self.max_h_total;
        }
        self.max_h_total.min(h_active + self.max_h_blank)
    }

    pub fn max_v_back(&self, v_front: i64, v_sync: i64) -> i64 {
        let front = clamp(v_front, self.min_v_front, self.max_v_front);
        let sync = clamp(v_sync, self.min_v_sync, self.max_v_sync);
        self.max_v_back.min(self.max_v_blank - front - sync)
    }

    pub fn min_v_blank(&self, v_front: i64, v_sync: i64) -> i64 {
        let front = clamp(v_front, self.min_v_front, self.max_v_front);
        let sync = clamp(v_sync, self.min_v_sync, self.max_v_sync);
        self.min_v_blank.max(front + sync + self.min_v_back)
    }

    pub fn min_v_total(&self, v_active: i64, v_front: i64, v_sync: i64) -> i64 {
        let active = clamp(v_active, self.min_v_active, self.max_v_active);
        let front = clamp(v_front, self.min_v_front, self.max_v_front);
        let sync = clamp(v_sync, self.min_v_sync, self.max_v_sync);
        self.min_v_total.max(active + front + sync + self.min_v_back)
    }

    pub fn max_v_total(&self, v_active: i64) -> i64 {
        if v_active < self.min_v_active || v_active > self.max_v_active {
            return self.max_v_total;
        }
        self.max_v_total.min(v_active + self.max_v_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_maps_unset_to_min() {
        assert_eq!(clamp(UNSET, 1, 100), 1);
        assert_eq!(clamp(-5, 1, 100), 1);
        assert_eq!(clamp(500, 1, 100), 100);
        assert_eq!(clamp(42, 1, 100), 42);
    }

    #[test]
    fn both_classes_share_the_populated_table() {
        assert_eq!(DisplayClass::Crt.limits(), DisplayClass::Lcd.limits());
    }

    #[test]
    fn max_back_shrinks_with_front_and_sync() {
        let l = &STANDARD;
        // With unset siblings the back porch gets the widest window.
        let widest = l.max_h_back(UNSET, UNSET);
        assert!(l.max_h_back(4096, 1024) < widest);
    }

    #[test]
    fn min_total_covers_active_plus_chosen_porches() {
        let l = &STANDARD;
        assert_eq!(l.min_h_total(1920, 88, 44), 1920 + 88 + 44);
        // Unset porches count as their minimum.
        assert_eq!(l.min_h_total(1920, UNSET, UNSET), 1920 + 1 + 1);
    }

    #[test]
    fn max_total_is_monotonic_in_active_until_ceiling() {
        let l = &STANDARD;
        let mut prev = 0;
        for active in (1..=65_536).step_by(4096) {
            let max = l.max_h_total(active);
            assert!(max >= prev, "max total regressed at active={active}");
            assert!(max <= l.max_h_total);
            prev = max;
        }
        // Saturates at the global ceiling for large active sizes.
        assert_eq!(l.max_h_total(65_536), l.max_h_total);
    }

    #[test]
    fn out_of_range_active_falls_back_to_global_max_total() {
        let l = &STANDARD;
        assert_eq!(l.max_h_total(UNSET), l.max_h_total);
        assert_eq!(l.max_v_total(0), l.max_v_total);
    }
}
