//! Settings groups that make up [`MonitorConfig`](super::MonitorConfig)
//!
//! Each group maps to one TOML table:
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 19200
//! read_timeout_ms = 100
//!
//! [capture]
//! output_dir = "captures"
//! silence_threshold_ms = 2000
//!
//! [ui]
//! tick_interval_ms = 50
//!
//! [logging]
//! file_logging = false
//! ```

use super::{
    DEFAULT_BAUD_RATE, DEFAULT_FILE_EXTENSION, DEFAULT_FILE_PREFIX, DEFAULT_OUTPUT_DIR,
    DEFAULT_READ_TIMEOUT, DEFAULT_SILENCE_THRESHOLD, DEFAULT_TICK_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Serial port parameters
///
/// Data bits, parity and stop bits are fixed at 8-N-1 and are not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Port to preselect in the UI
    pub port: Option<String>,

    /// Baud rate
    pub baud_rate: u32,

    /// Upper bound on a single blocking read
    #[serde(rename = "read_timeout_ms", with = "duration_ms")]
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl SerialSettings {
    /// Settings for a user-chosen baud rate, all else default
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Capture file placement and rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Directory capture files are written to (created if absent)
    pub output_dir: PathBuf,

    /// Idle gap that ends a burst and closes the current file
    #[serde(rename = "silence_threshold_ms", with = "duration_ms")]
    pub silence_threshold: Duration,

    /// File name prefix, followed by `_<YYYYMMDD>_<HHMMSS>`
    pub file_prefix: String,

    /// File extension without the dot
    pub file_extension: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

/// Presentation loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Period of the drain/silence tick
    #[serde(rename = "tick_interval_ms", with = "duration_ms")]
    pub tick_interval: Duration,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Also write a daily log file under `<output_dir>/logs`
    pub file_logging: bool,

    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_logging: false,
            level: "info,rs232mon=debug".to_string(),
        }
    }
}

/// Serialize a [`Duration`] as whole milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
