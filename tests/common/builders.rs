//! Test data builders for creating test objects

use rs232mon::config::{CaptureSettings, MonitorConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for a [`MonitorConfig`] writing into a test directory
pub struct ConfigBuilder {
    output_dir: PathBuf,
    silence: Duration,
    read_timeout: Duration,
    prefix: String,
}

impl ConfigBuilder {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            silence: Duration::from_secs(2),
            read_timeout: Duration::from_millis(10),
            prefix: "capture".to_string(),
        }
    }

    pub fn silence(mut self, silence: Duration) -> Self {
        self.silence = silence;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            output_dir: self.output_dir.clone(),
            silence_threshold: self.silence,
            file_prefix: self.prefix.clone(),
            ..CaptureSettings::default()
        }
    }

    pub fn build(self) -> MonitorConfig {
        let mut config = MonitorConfig {
            capture: self.capture_settings(),
            ..MonitorConfig::default()
        };
        config.serial.read_timeout = self.read_timeout;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new(Path::new("out"))
            .silence(Duration::from_millis(300))
            .prefix("log")
            .build();

        assert_eq!(config.capture.output_dir, PathBuf::from("out"));
        assert_eq!(config.capture.silence_threshold, Duration::from_millis(300));
        assert_eq!(config.capture.file_prefix, "log");
        assert!(config.validate().is_ok());
    }
}
