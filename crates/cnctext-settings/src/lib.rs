//! CNCtext Settings Crate
//!
//! Loads, validates and saves the label, machine and coordinate system
//! configuration shared by the engraving tools.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, FontSettings, APP_DIR, CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};
