//! Frontend module for egui UI
//!
//! This module provides the monitor window using eframe/egui. It owns the
//! [`Monitor`], drives its tick from the egui frame loop and renders the
//! events the monitor reports.
//!
//! # Layout
//!
//! - Top: connection toolbar (port, baud, output directory, connect toggle)
//! - Center: timestamped event log
//! - Bottom: status bar with the last closed file and capture counters
//!
//! # Main Types
//!
//! - [`MonitorApp`] - Application state implementing [`eframe::App`]
//! - [`AppAction`] - Requests emitted by panels and applied after drawing
//! - [`LogView`] - Bounded log pane

pub mod log_view;
pub mod state;
pub mod status_bar;
pub mod toolbar;

pub use log_view::{LogEntry, LogView};
pub use state::{AppAction, ConnectionForm};

use crate::backend::{list_ports, PortInfo};
use crate::capture::Ticker;
use crate::events::EventReceiver;
use crate::session::Monitor;
use status_bar::{render_status_bar, StatusBarContext};
use std::time::Instant;
use toolbar::{render_toolbar, ToolbarContext};

/// Ports offered in the selector
///
/// With the `mock-source` feature a scripted demo port is listed first.
pub fn available_ports() -> Vec<PortInfo> {
    #[allow(unused_mut)]
    let mut ports = list_ports();
    #[cfg(feature = "mock-source")]
    ports.insert(0, crate::backend::mock_source::mock_port_info());
    ports
}

/// Main application window
pub struct MonitorApp {
    monitor: Monitor,
    events: EventReceiver,
    form: ConnectionForm,
    log: LogView,
    ticker: Ticker,
}

impl MonitorApp {
    /// Create the app around a monitor and its event receiver
    pub fn new(monitor: Monitor, events: EventReceiver) -> Self {
        let form = ConnectionForm::from_settings(&monitor.config().serial);
        let ticker = Ticker::new(monitor.config().ui.tick_interval);
        Self {
            monitor,
            events,
            form,
            log: LogView::default(),
            ticker,
        }
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn log(&self) -> &LogView {
        &self.log
    }

    pub fn form_mut(&mut self) -> &mut ConnectionForm {
        &mut self.form
    }

    /// Re-enumerate ports into the selector
    pub fn refresh_ports(&mut self) {
        let ports = available_ports();
        tracing::debug!("Found {} serial ports", ports.len());
        self.form.set_ports(ports);
    }

    /// Run the monitor tick if due and move new events into the log
    ///
    /// Returns true if any events were received.
    pub fn pump(&mut self, now: Instant) -> bool {
        if self.ticker.due(now) {
            self.monitor.on_tick_at(now);
        }
        self.process_events()
    }

    fn process_events(&mut self) -> bool {
        let events = self.events.drain();
        for event in &events {
            self.log.push_event(event);
        }
        !events.is_empty()
    }

    /// Apply one panel action
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::RefreshPorts => self.refresh_ports(),
            AppAction::Connect { port, baud } => {
                // Failures are already reported through the event channel
                if let Err(e) = self.monitor.connect(&port, baud) {
                    tracing::debug!("Connect to {} rejected: {}", port, e);
                }
            }
            AppAction::Disconnect => self.monitor.disconnect(),
            AppAction::SetOutputDir(dir) => self.monitor.set_output_dir(dir),
            AppAction::Warn(message) => {
                tracing::warn!("{}", message);
                self.log.push_message(message, true);
            }
        }
        self.process_events();
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.pump(now);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            let toolbar_ctx = ToolbarContext {
                status: self.monitor.status(),
                output_dir: self.monitor.output_dir(),
            };
            actions.extend(render_toolbar(ui, &mut self.form, &toolbar_ctx));
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status_ctx = StatusBarContext {
                stats: self.monitor.stats(),
                current_file: self.monitor.current_file(),
                last_file: self.monitor.last_file(),
            };
            render_status_bar(ui, &status_ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Log");
            self.log.render(ui);
        });

        for action in actions {
            self.handle_action(action);
        }

        // Keep ticking while idle; egui only repaints on input otherwise
        ctx.request_repaint_after(self.ticker.time_until_next(Instant::now()));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("Window closing, ending session");
        self.monitor.disconnect();
        self.process_events();
    }
}
