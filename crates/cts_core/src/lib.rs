//! CTS Core - Backend logic for CRT Timing Studio
//!
//! This crate contains the full scan-timing computation engine with zero
//! UI dependencies. It can be used by the CLI front end or embedded in
//! another tool.
//!
//! The engine maintains a set of mutually-dependent timing fields
//! (porches, sync widths, blanking, totals, pixel clock, scan rates) and
//! keeps them self-consistent through every mutation. Automatic timing
//! modes derive a complete parameter set from the active resolution and
//! a target refresh rate using CVT, CVT Reduced-Blanking, GTF, or a
//! catalog of known-good standard modes.

pub mod algorithms;
pub mod config;
pub mod limits;
pub mod logging;
pub mod models;
pub mod refine;
pub mod timing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
