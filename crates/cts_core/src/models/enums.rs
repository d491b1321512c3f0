//! Core enums used throughout the engine.

use serde::{Deserialize, Serialize};

/// Display class selecting which validity range table bounds fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    /// CRT-era analog displays.
    #[default]
    Crt,
    /// Fixed-pixel digital displays.
    Lcd,
}

impl std::fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayClass::Crt => write!(f, "crt"),
            DisplayClass::Lcd => write!(f, "lcd"),
        }
    }
}

/// How the timing parameter set is derived.
///
/// `Manual` keeps every field under caller control; the automatic modes
/// re-derive porches, sync widths, and the pixel clock from active size,
/// interlace flag, and target refresh rate whenever an input changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingMode {
    /// Caller supplies every field.
    #[default]
    Manual,
    /// Catalog of LCD standard modes, CVT-RB fallback.
    LcdStandard,
    /// Catalog of native panel modes, CVT-RB at 60 Hz fallback.
    LcdNative,
    /// CVT Reduced-Blanking with pixel-clock budget fallback.
    LcdReduced,
    /// Catalog of CRT standard modes, CVT fallback.
    CrtStandard,
    /// Catalog of legacy modes, GTF fallback.
    OldStandard,
}

impl TimingMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::LcdStandard => "Automatic - LCD standard",
            Self::LcdNative => "Automatic - LCD native",
            Self::LcdReduced => "Automatic - LCD reduced",
            Self::CrtStandard => "Automatic - CRT standard",
            Self::OldStandard => "Automatic - Old standard",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [TimingMode] {
        &[
            Self::Manual,
            Self::LcdStandard,
            Self::LcdNative,
            Self::LcdReduced,
            Self::CrtStandard,
            Self::OldStandard,
        ]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this mode (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }

    /// Whether this mode re-derives the parameter set automatically.
    pub fn is_automatic(&self) -> bool {
        !matches!(self, Self::Manual)
    }
}

impl std::fmt::Display for TimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sync pulse polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Active-low sync pulse.
    #[default]
    Negative,
    /// Active-high sync pulse.
    Positive,
}

impl Polarity {
    /// Sign character used by the textual report.
    pub fn sign_char(&self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sign_char())
    }
}

/// Which member of a porch/blank/total triad the caller supplied last.
///
/// The recompute engine derives the other two from the anchored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PorchAnchor {
    /// Back porch is authoritative; blanking and total are derived.
    #[default]
    Back,
    /// Blanking is authoritative; back porch and total are derived.
    Blank,
    /// Total is authoritative; back porch and blanking are derived.
    Total,
}

/// Which member of the rate/h-rate/clock triad the caller supplied last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateAnchor {
    /// Vertical refresh rate is authoritative.
    #[default]
    VRate,
    /// Horizontal scan rate is authoritative.
    HRate,
    /// Pixel clock is authoritative.
    Clock,
}
