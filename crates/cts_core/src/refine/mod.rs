//! Iterative timing refinement.
//!
//! A [`Refiner`] drives a subject toward a set of goals by round-robin
//! application of small adjustment steps. Each goal maps the subject to
//! a signed distance (zero means satisfied); each step nudges one knob,
//! reading the goal histories to decide which direction to move. The
//! engine is generic so the same machinery can chase a pixel clock, a
//! scan rate, or anything else with a numeric error measure.

mod clock;

pub use clock::{refine_to_clock, ClockTarget};

use std::collections::VecDeque;

use thiserror::Error;

/// Default adjustment budget before a run gives up.
pub const DEFAULT_BUDGET: usize = 20_000;

/// How many evaluations each goal history retains.
const HISTORY_CAP: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefineError {
    /// The step budget ran out before every goal reached zero. The
    /// subject keeps the state of the last step taken.
    #[error("no convergence after {steps} adjustment steps")]
    BudgetExhausted { steps: usize },
}

/// Signed distance from one goal, recorded once per round.
#[derive(Debug, Clone, Default)]
pub struct GoalHistory {
    values: VecDeque<i64>,
    deltas: VecDeque<i64>,
}

impl GoalHistory {
    fn record(&mut self, value: i64) {
        let delta = match self.values.back() {
            Some(prev) => value - prev,
            None => 0,
        };
        if self.values.len() == HISTORY_CAP {
            self.values.pop_front();
            self.deltas.pop_front();
        }
        self.values.push_back(value);
        self.deltas.push_back(delta);
    }

    /// Most recent goal value.
    pub fn last(&self) -> Option<i64> {
        self.values.back().copied()
    }

    /// Change between the two most recent values.
    pub fn last_delta(&self) -> Option<i64> {
        self.deltas.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Maps the subject to a signed distance; zero means satisfied.
pub type Goal<T> = Box<dyn Fn(&T) -> i64>;

/// Adjusts the subject, consulting the goal histories for direction.
pub type Step<T> = Box<dyn Fn(&mut T, &[GoalHistory])>;

/// A goal-seeking loop over an arbitrary subject.
pub struct Refiner<T> {
    goals: Vec<Goal<T>>,
    steps: Vec<Step<T>>,
    budget: usize,
}

impl<T> Default for Refiner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Refiner<T> {
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            steps: Vec::new(),
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn goal(mut self, goal: impl Fn(&T) -> i64 + 'static) -> Self {
        self.goals.push(Box::new(goal));
        self
    }

    pub fn step(mut self, step: impl Fn(&mut T, &[GoalHistory]) + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Run the loop until every goal evaluates to zero or the budget is
    /// spent. Returns the number of steps taken.
    pub fn run(&self, subject: &mut T) -> Result<usize, RefineError> {
        let mut histories: Vec<GoalHistory> = vec![GoalHistory::default(); self.goals.len()];
        let mut taken = 0usize;

        loop {
            let mut satisfied = true;
            for (goal, history) in self.goals.iter().zip(histories.iter_mut()) {
                let value = goal(subject);
                history.record(value);
                satisfied &= value == 0;
            }
            if satisfied {
                tracing::debug!(steps = taken, "refinement converged");
                return Ok(taken);
            }
            if taken >= self.budget || self.steps.is_empty() {
                tracing::debug!(steps = taken, "refinement budget exhausted");
                return Err(RefineError::BudgetExhausted { steps: taken });
            }
            let step = &self.steps[taken % self.steps.len()];
            step(subject, &histories);
            taken += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Knob {
        value: i64,
    }

    fn toward(target: i64) -> Refiner<Knob> {
        Refiner::new()
            .goal(move |k: &Knob| k.value - target)
            .step(|k: &mut Knob, h: &[GoalHistory]| {
                if h[0].last().unwrap_or(0) > 0 {
                    k.value -= 1;
                } else {
                    k.value += 1;
                }
            })
    }

    #[test]
    fn converges_and_counts_steps() {
        let mut k = Knob { value: 10 };
        let steps = toward(3).run(&mut k).unwrap();
        assert_eq!(k.value, 3);
        assert_eq!(steps, 7);
    }

    #[test]
    fn already_satisfied_takes_no_steps() {
        let mut k = Knob { value: 3 };
        assert_eq!(toward(3).run(&mut k), Ok(0));
    }

    #[test]
    fn budget_exhaustion_keeps_partial_progress() {
        let mut k = Knob { value: 10 };
        let err = toward(0).with_budget(4).run(&mut k).unwrap_err();
        assert_eq!(err, RefineError::BudgetExhausted { steps: 4 });
        assert_eq!(k.value, 6);
    }

    #[test]
    fn steps_alternate_round_robin() {
        let refiner = Refiner::new()
            .goal(|k: &Knob| k.value)
            .step(|k: &mut Knob, _: &[GoalHistory]| k.value -= 1)
            .step(|k: &mut Knob, _: &[GoalHistory]| k.value -= 3);
        let mut k = Knob { value: 8 };
        // -1, -3, -1, -3 reaches zero in four steps.
        assert_eq!(refiner.run(&mut k), Ok(4));
    }

    #[test]
    fn history_records_values_and_deltas() {
        let mut history = GoalHistory::default();
        assert!(history.is_empty());
        history.record(10);
        history.record(7);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some(7));
        assert_eq!(history.last_delta(), Some(-3));
    }

    #[test]
    fn history_is_bounded() {
        let mut history = GoalHistory::default();
        for i in 0..250 {
            history.record(i);
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.last(), Some(249));
    }

    #[test]
    fn no_steps_means_immediate_exhaustion() {
        let refiner = Refiner::new().goal(|k: &Knob| k.value);
        let mut k = Knob { value: 5 };
        assert_eq!(
            refiner.run(&mut k),
            Err(RefineError::BudgetExhausted { steps: 0 })
        );
    }
}
