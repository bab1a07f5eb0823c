//! Configuration module for rs232mon
//!
//! This module holds the monitor's constants and the [`MonitorConfig`]
//! loaded at startup. Configuration is read-only: the monitor never writes
//! it back, so nothing set in the UI survives a restart.
//!
//! # Sources
//!
//! In order of precedence:
//! 1. A TOML path given as the first command-line argument
//! 2. A TOML path in the `RS232MON_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! A named file that does not exist falls back to defaults with a warning.
//!
//! # Example
//!
//! ```ignore
//! use rs232mon::config::MonitorConfig;
//!
//! let config = MonitorConfig::from_toml_str("[serial]\nbaud_rate = 9600\n")?;
//! assert_eq!(config.serial.baud_rate, 9600);
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "RS232MON_CONFIG";

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 19200;

/// Idle gap that closes the current capture file
pub const DEFAULT_SILENCE_THRESHOLD: Duration = Duration::from_secs(2);

/// Upper bound on a single serial read
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Period of the drain/silence tick
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// How long disconnect waits for the reader task to exit
pub const DISCONNECT_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Default capture directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "captures";

/// Default capture file name prefix
pub const DEFAULT_FILE_PREFIX: &str = "capture";

/// Default capture file extension
pub const DEFAULT_FILE_EXTENSION: &str = "csv";

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub serial: SerialSettings,
    pub capture: CaptureSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

impl MonitorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from the command line / environment, or use defaults
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_or_default(arg_path: Option<PathBuf>) -> Result<Self> {
        let path = arg_path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {:?}", path);
                Self::load(&path)
            }
            Some(path) => {
                tracing::warn!("Config file {:?} not found, using defaults", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would stall capture
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(MonitorError::Config("baud_rate must be positive".to_string()));
        }
        if self.serial.read_timeout.is_zero() {
            return Err(MonitorError::Config(
                "read_timeout_ms must be positive".to_string(),
            ));
        }
        if self.capture.silence_threshold.is_zero() {
            return Err(MonitorError::Config(
                "silence_threshold_ms must be positive".to_string(),
            ));
        }
        if self.ui.tick_interval.is_zero() {
            return Err(MonitorError::Config(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.capture.file_prefix.is_empty() {
            return Err(MonitorError::Config("file_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Parse baud rate text typed by the user
pub fn parse_baud(text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(baud) if baud > 0 => Ok(baud),
        _ => Err(MonitorError::InvalidBaud(text.to_string())),
    }
}
