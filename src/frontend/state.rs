//! UI state and action types for the frontend
//!
//! Panels render from [`ConnectionForm`] and return [`AppAction`]s instead of
//! calling into the monitor directly; the app applies them after drawing.

use crate::backend::PortInfo;
use crate::config::{parse_baud, SerialSettings};
use std::path::PathBuf;

/// Actions that a panel can emit
///
/// Panels return `Vec<AppAction>` instead of mutating state directly.
/// This enables:
/// - Testable input handling
/// - A single place where the monitor is driven
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Re-enumerate serial ports
    RefreshPorts,
    /// Open the selected port
    Connect { port: String, baud: u32 },
    /// End the current session
    Disconnect,
    /// Use a new output directory for subsequent files
    SetOutputDir(PathBuf),
    /// Show a validation message in the log
    Warn(String),
}

/// Editable inputs of the connection toolbar
#[derive(Debug, Clone, Default)]
pub struct ConnectionForm {
    pub ports: Vec<PortInfo>,
    pub selected_port: Option<String>,
    pub baud_input: String,
}

impl ConnectionForm {
    /// Initial form contents from the serial settings
    pub fn from_settings(settings: &SerialSettings) -> Self {
        Self {
            ports: Vec::new(),
            selected_port: settings.port.clone(),
            baud_input: settings.baud_rate.to_string(),
        }
    }

    /// Replace the port list, selecting the first port if none is selected
    pub fn set_ports(&mut self, ports: Vec<PortInfo>) {
        if self.selected_port.is_none() {
            self.selected_port = ports.first().map(|p| p.name.clone());
        }
        self.ports = ports;
    }

    /// Build the connect action, or a warning if the inputs are unusable
    pub fn connect_action(&self) -> AppAction {
        let port = match self.selected_port.as_deref().map(str::trim) {
            Some(port) if !port.is_empty() => port.to_string(),
            _ => return AppAction::Warn("Choose a serial port.".to_string()),
        };
        match parse_baud(&self.baud_input) {
            Ok(baud) => AppAction::Connect { port, baud },
            Err(_) => AppAction::Warn("Baud must be a positive integer.".to_string()),
        }
    }
}
