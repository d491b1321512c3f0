//! Parameter model and recompute engine.
//!
//! `DetailedTiming` owns the ~20 interdependent scan-timing fields and
//! exposes one named setter per field. Each setter records which member
//! of its dependent triad the caller supplied (back porch, blanking, or
//! total; vertical rate, horizontal rate, or pixel clock) and re-derives
//! the rest, either directly or through the automatic timing algorithms
//! in [`crate::algorithms`].

mod error;
mod recompute;
pub mod report;
mod state;

pub use error::{TimingError, TimingResult};
pub use state::DetailedTiming;
