//! Configuration file handling.
//!
//! Every section is defaulted, so a file only needs to name the values it
//! overrides:
//!
//! ```toml
//! [font]
//! path = "/usr/share/cnctext/normal.chr"
//!
//! [label]
//! width = 30.0
//!
//! [coordinates]
//! start = 55
//! count = 3
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use cnctext_core::{ConfigError, ConfigResult, Font};
use cnctext_engraver::{CoordinateRange, EngraverParameters, LabelParameters, ProgramGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// Name of the application directory under the user config directory
pub const APP_DIR: &str = "cnctext";
/// Default configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// On-disk configuration format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// Font selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Path to a `.chr` stroke font
    pub path: Option<PathBuf>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font: FontSettings,
    pub label: LabelParameters,
    pub machine: EngraverParameters,
    pub coordinates: CoordinateRange,
}

impl Config {
    /// `<config dir>/cnctext/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load and validate a config file (JSON or TOML).
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };
        config.validate()?;

        info!("Loaded {} config from {}", format, path.display());
        Ok(config)
    }

    /// Validate and save to a file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = ConfigFormat::from_path(path)?;
        self.validate()?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::Save {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!("Saved {} config to {}", format, path.display());
        Ok(())
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let label = &self.label;
        if !is_positive(label.width) {
            return Err(out_of_range("label.width", label.width));
        }
        if !is_positive(label.char_height) {
            return Err(out_of_range("label.char_height", label.char_height));
        }
        if label.line_spread.is_nan() || label.line_spread < 0.0 {
            return Err(out_of_range("label.line_spread", label.line_spread));
        }
        if label.max_lines == 0 {
            return Err(out_of_range("label.max_lines", label.max_lines));
        }

        let machine = &self.machine;
        let ordered = machine.z_engrave < machine.z_clear && machine.z_clear <= machine.z_travel;
        if !ordered {
            return Err(ConfigError::Incompatible(format!(
                "heights must satisfy z_engrave < z_clear <= z_travel, got {} / {} / {}",
                machine.z_engrave, machine.z_clear, machine.z_travel
            )));
        }
        if machine.rapid_feed == 0 {
            return Err(out_of_range("machine.rapid_feed", machine.rapid_feed));
        }
        if machine.interpolate_feed == 0 {
            return Err(out_of_range(
                "machine.interpolate_feed",
                machine.interpolate_feed,
            ));
        }

        self.coordinates.systems()?;
        Ok(())
    }

    /// A program generator using this configuration
    pub fn generator<'f>(&self, font: &'f Font) -> ProgramGenerator<'f> {
        ProgramGenerator::new(
            font,
            self.label.clone(),
            self.machine.clone(),
            self.coordinates,
        )
    }
}

fn is_positive(value: f64) -> bool {
    value > 0.0
}

fn out_of_range(key: &str, value: impl fmt::Display) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
