//! Pixel-clock refinement over a timing parameter set.
//!
//! Chases a target pixel clock with a 2% tolerance band by trimming or
//! growing the porch and sync fields, 8 pixels at a time horizontally
//! and one line at a time vertically. A field is never pushed below its
//! floor and the smallest member of each triad is left alone, so the
//! timing keeps a plausible shape while the clock moves.

use crate::timing::DetailedTiming;

use super::{GoalHistory, RefineError, Refiner, DEFAULT_BUDGET};

const H_QUANTUM: i64 = 8;
const H_FLOOR: i64 = 8;
const V_FLOOR: i64 = 3;

/// Target pixel clock in hundredths of a MHz, with a step budget.
#[derive(Debug, Clone, Copy)]
pub struct ClockTarget {
    pub clock: i64,
    pub budget: usize,
}

impl ClockTarget {
    pub fn new(clock: i64) -> Self {
        Self {
            clock,
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Half-width of the acceptance band, 2% of the target, floored at
    /// one clock unit so small targets keep a nonzero tolerance.
    fn band(&self) -> i64 {
        (self.clock * 2 / 100).max(1)
    }
}

/// Adjust the timing until its pixel clock lands within 2% of `target`.
///
/// Returns the number of adjustment steps taken. On budget exhaustion
/// the timing keeps the state of the last step, which is usually closer
/// to the target than where it started.
pub fn refine_to_clock(
    timing: &mut DetailedTiming,
    target: ClockTarget,
) -> Result<usize, RefineError> {
    let low = target.clock - target.band();
    let high = target.clock + target.band();

    let refiner = Refiner::new()
        .with_budget(target.budget)
        .goal(move |t: &DetailedTiming| {
            let clock = t.p_clock().unwrap_or(0);
            if clock < low {
                clock - low
            } else if clock > high {
                clock - high
            } else {
                0
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.h_front > H_FLOOR && min3(t.h_front, t.h_sync, t.h_back) != t.h_front {
                t.set_h_front(t.h_front - H_QUANTUM * dir);
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.h_back > H_FLOOR && min3(t.h_front, t.h_sync, t.h_back) != t.h_back {
                t.set_h_back(t.h_back - H_QUANTUM * dir);
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.h_sync > H_FLOOR && min3(t.h_front, t.h_sync, t.h_back) != t.h_sync {
                t.set_h_sync(t.h_sync - H_QUANTUM * dir);
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.v_front > V_FLOOR && min3(t.v_front, t.v_sync, t.v_back) != t.v_front {
                t.set_v_front(t.v_front - dir);
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.v_back > V_FLOOR && min3(t.v_front, t.v_sync, t.v_back) != t.v_back {
                t.set_v_back(t.v_back - dir);
            }
        })
        .step(|t: &mut DetailedTiming, h: &[GoalHistory]| {
            let dir = direction(h);
            if t.v_sync > V_FLOOR && min3(t.v_front, t.v_sync, t.v_back) != t.v_sync {
                t.set_v_sync(t.v_sync - dir);
            }
        });

    refiner.run(timing)
}

/// Shrink when the clock overshoots, grow when it undershoots.
fn direction(histories: &[GoalHistory]) -> i64 {
    match histories[0].last() {
        Some(value) if value < 0 => -1,
        _ => 1,
    }
}

fn min3(a: i64, b: i64, c: i64) -> i64 {
    a.min(b).min(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayClass, TimingMode};

    fn tv_mode() -> DetailedTiming {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(600);
        t.set_v_active(240);
        t.set_interlaced(true);
        t.set_mode(TimingMode::CrtStandard);
        t.set_v_rate(60_000);
        t
    }

    #[test]
    fn refines_down_to_a_tv_clock() {
        let mut t = tv_mode();
        assert_eq!(t.p_clock(), Some(1_146));
        let steps = refine_to_clock(&mut t, ClockTarget::new(960)).unwrap();
        assert!(steps > 0);
        let clock = t.p_clock().unwrap();
        assert!((941..=979).contains(&clock), "clock {clock} outside band");
        // The first field edit drops the timing back to manual control.
        assert_eq!(t.mode(), TimingMode::Manual);
        assert_eq!(t.v_rate(), Some(60_000));
    }

    #[test]
    fn within_band_is_a_no_op() {
        let mut t = tv_mode();
        let before = t.clone();
        // 1150 +/- 23 already covers the settled 1146.
        assert_eq!(refine_to_clock(&mut t, ClockTarget::new(1_150)), Ok(0));
        assert_eq!(t, before);
    }

    #[test]
    fn small_targets_keep_a_usable_band() {
        let mut t = DetailedTiming::new(DisplayClass::Crt);
        t.set_h_active(640);
        t.set_v_active(240);
        t.set_h_front(48);
        t.set_h_sync(32);
        t.set_h_back(80);
        t.set_v_front(3);
        t.set_v_sync(3);
        t.set_v_back(4);
        t.set_v_rate(1_950);
        assert_eq!(t.p_clock(), Some(39));
        // 2% of 40 truncates to zero; the one-unit band floor still
        // counts a clock one unit off as converged.
        assert_eq!(refine_to_clock(&mut t, ClockTarget::new(40)), Ok(0));
    }

    #[test]
    fn budget_exhaustion_reports_steps_taken() {
        let mut t = tv_mode();
        let err = refine_to_clock(&mut t, ClockTarget::new(960).with_budget(3)).unwrap_err();
        assert_eq!(err, RefineError::BudgetExhausted { steps: 3 });
        // Partial progress is kept.
        assert!(t.p_clock().unwrap() < 1_146);
    }
}
