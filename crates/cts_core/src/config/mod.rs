//! Configuration management for CRT Timing Studio.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use cts_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Refine budget: {}", config.settings().refine.budget);
//!
//! // Modify a setting
//! config.settings_mut().refine.budget = 5000;
//!
//! // Save just the refine section atomically
//! config.update_section(ConfigSection::Refine).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, GeneralSettings, LoggingSettings, RefineSettings, Settings};
