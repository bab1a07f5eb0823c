//! Timestamped event log pane

use crate::events::CaptureEvent;
use chrono::{DateTime, Local};
use egui::{Color32, RichText, Ui};
use std::collections::VecDeque;

/// Lines kept before the oldest are discarded
pub const MAX_LOG_LINES: usize = 1000;

/// One line in the log pane
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub message: String,
    pub is_error: bool,
}

impl LogEntry {
    /// `HH:MM:SS  message`
    pub fn formatted(&self) -> String {
        format!("{}  {}", self.time.format("%H:%M:%S"), self.message)
    }
}

/// Bounded, append-only log of events as they were displayed
#[derive(Debug, Clone)]
pub struct LogView {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogView {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }
}

impl LogView {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an event, stamped with the current local time
    pub fn push_event(&mut self, event: &CaptureEvent) {
        self.push_at(Local::now(), event.to_string(), event.is_error());
    }

    /// Append a message raised by the UI itself, such as input validation
    pub fn push_message(&mut self, message: impl Into<String>, is_error: bool) {
        self.push_at(Local::now(), message.into(), is_error);
    }

    pub fn push_at(&mut self, time: DateTime<Local>, message: String, is_error: bool) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            time,
            message,
            is_error,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the log, following new lines
    pub fn render(&self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &self.entries {
                    let text = RichText::new(entry.formatted()).monospace();
                    if entry.is_error {
                        ui.colored_label(Color32::LIGHT_RED, text);
                    } else {
                        ui.label(text);
                    }
                }
            });
    }
}
