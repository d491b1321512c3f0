//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{DisplayClass, TimingMode};
use crate::refine::DEFAULT_BUDGET;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Engine defaults applied to new timings.
    #[serde(default)]
    pub general: GeneralSettings,

    /// Pixel-clock refinement settings.
    #[serde(default)]
    pub refine: RefineSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Defaults for newly created timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Display class selecting the validity range table.
    #[serde(default)]
    pub display_class: DisplayClass,

    /// Timing mode applied when none is given on the command line.
    #[serde(default)]
    pub mode: TimingMode,

    /// Whether timings start out interlaced.
    #[serde(default)]
    pub interlaced: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            display_class: DisplayClass::default(),
            mode: TimingMode::default(),
            interlaced: false,
        }
    }
}

/// Pixel-clock refinement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineSettings {
    /// Adjustment step budget before a refinement run gives up.
    #[serde(default = "default_budget")]
    pub budget: usize,

    /// Default target pixel clock in hundredths of a MHz, applied when
    /// no target is given on the command line.
    #[serde(default)]
    pub target_clock: Option<i64>,
}

impl Default for RefineSettings {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            target_clock: None,
        }
    }
}

fn default_budget() -> usize {
    DEFAULT_BUDGET
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum log level.
    #[serde(default)]
    pub level: LogLevel,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
        }
    }
}

/// Identifies a config section for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    General,
    Refine,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Refine => "refine",
            Self::Logging => "logging",
        }
    }
}
