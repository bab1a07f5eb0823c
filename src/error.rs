//! Error handling for rs232mon
//!
//! This module defines the crate error type and a Result alias used by the
//! transport, capture and configuration layers.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rs232mon operations
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Errors reported by the serial transport
    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A capture file could not be created
    #[error("Cannot open capture file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Errors related to configuration loading
    #[error("Configuration error: {0}")]
    Config(String),

    /// Baud rate text could not be used
    #[error("Invalid baud rate: {0:?}")]
    InvalidBaud(String),

    /// Operation requires an open session
    #[error("Not connected")]
    NotConnected,

    /// Connect was requested while a session is already open
    #[error("Already connected to {0}")]
    AlreadyConnected(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MonitorError>,
    },
}

impl MonitorError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MonitorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for rs232mon operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| MonitorError::from(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitorError::InvalidBaud("fast".to_string());
        assert_eq!(err.to_string(), "Invalid baud rate: \"fast\"");
    }

    #[test]
    fn test_error_with_context() {
        let err = MonitorError::Config("missing field".to_string());
        let with_ctx = err.with_context("Failed to load monitor.toml");
        assert!(with_ctx.to_string().contains("Failed to load monitor.toml"));
        assert!(with_ctx.to_string().contains("missing field"));
    }

    #[test]
    fn test_file_open_error_names_path() {
        let err = MonitorError::FileOpen {
            path: PathBuf::from("captures/capture_20240101_120000.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("capture_20240101_120000.csv"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_io_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result.context("Reading config").unwrap_err();
        assert!(matches!(err, MonitorError::WithContext { .. }));
        assert!(err.to_string().starts_with("Reading config"));
    }
}
