//! Data models for CRT Timing Studio.
//!
//! This module contains the core data types shared across the engine:
//! - Enums for display class, timing mode, polarity, and the
//!   "last edited" anchor markers
//! - The serializable `TimingSummary` snapshot

mod enums;
mod summary;

// Re-export all public types
pub use enums::{DisplayClass, Polarity, PorchAnchor, RateAnchor, TimingMode};
pub use summary::TimingSummary;
