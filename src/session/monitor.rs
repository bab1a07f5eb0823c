//! Session controller tying the reader thread to the capture engine

use crate::backend::{ReaderHandle, ReaderItem, SourceOpener};
use crate::capture::{CaptureEngine, TickOutcome};
use crate::config::{MonitorConfig, SerialSettings, DISCONNECT_JOIN_TIMEOUT};
use crate::error::{MonitorError, Result, ResultExt};
use crate::events::{event_channel, CaptureEvent, EventReceiver, EventSender};
use crate::types::{CaptureStats, CloseReason, ConnectionStatus};
use crossbeam_channel::Receiver;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One connect-to-disconnect lifetime
struct ActiveSession {
    port: String,
    baud: u32,
    reader: ReaderHandle,
    items: Receiver<ReaderItem>,
}

/// Entry point for the presentation layer
///
/// Owns the capture engine and at most one active session. All methods run
/// on the caller's thread; only the reader runs elsewhere.
pub struct Monitor {
    config: MonitorConfig,
    opener: Box<dyn SourceOpener>,
    engine: CaptureEngine,
    session: Option<ActiveSession>,
    events: EventSender,
    join_timeout: Duration,
}

impl Monitor {
    /// Create a monitor and the receiver its events are delivered to
    pub fn new(config: MonitorConfig, opener: Box<dyn SourceOpener>) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel();
        let engine = CaptureEngine::new(&config.capture, events.clone());
        let monitor = Self {
            config,
            opener,
            engine,
            session: None,
            events,
            join_timeout: DISCONNECT_JOIN_TIMEOUT,
        };
        (monitor, receiver)
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn engine(&self) -> &CaptureEngine {
        &self.engine
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.session.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Port and baud of the open session
    pub fn connection(&self) -> Option<(&str, u32)> {
        self.session.as_ref().map(|s| (s.port.as_str(), s.baud))
    }

    /// Whether the reader thread of the open session is alive
    pub fn reader_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.reader.is_running())
    }

    pub fn last_file(&self) -> Option<&Path> {
        self.engine.last_file()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.engine.current_file()
    }

    pub fn stats(&self) -> &CaptureStats {
        self.engine.stats()
    }

    pub fn output_dir(&self) -> &Path {
        self.engine.output_dir()
    }

    /// Directory for capture files opened from now on
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        tracing::info!("Output directory set to {:?}", dir);
        self.config.capture.output_dir = dir.clone();
        self.engine.set_output_dir(dir);
    }

    /// Open `port` at `baud` and start the reader thread
    ///
    /// Open failures are reported as a `ConnectFailed` event and returned;
    /// no session is created.
    pub fn connect(&mut self, port: &str, baud: u32) -> Result<()> {
        if let Some(session) = &self.session {
            return Err(MonitorError::AlreadyConnected(session.port.clone()));
        }
        if baud == 0 {
            let err = MonitorError::InvalidBaud(baud.to_string());
            self.report_connect_failure(port, &err);
            return Err(err);
        }

        let settings = SerialSettings {
            port: Some(port.to_string()),
            baud_rate: baud,
            read_timeout: self.config.serial.read_timeout,
        };

        let source = match self.opener.open(port, &settings) {
            Ok(source) => source,
            Err(e) => {
                self.report_connect_failure(port, &e);
                return Err(e);
            }
        };

        let spawned =
            ReaderHandle::spawn(source, settings.read_timeout).context("Failed to start reader");
        let (reader, items) = match spawned {
            Ok(spawned) => spawned,
            Err(e) => {
                self.report_connect_failure(port, &e);
                return Err(e);
            }
        };

        self.session = Some(ActiveSession {
            port: port.to_string(),
            baud,
            reader,
            items,
        });
        self.config.serial.port = Some(port.to_string());
        self.config.serial.baud_rate = baud;
        self.events.emit(CaptureEvent::Connected {
            port: port.to_string(),
            baud,
        });
        Ok(())
    }

    /// End the session: stop the reader, close any capture, report
    ///
    /// Bytes already queued by the reader are committed before the file is
    /// closed. Does nothing when not connected.
    pub fn disconnect(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if !session.reader.stop_and_join(self.join_timeout) {
            tracing::warn!("Reader for {} was detached", session.port);
        }

        let now = Instant::now();
        for item in session.items.try_iter() {
            if let ReaderItem::Chunk(chunk) = item {
                self.engine.ingest_at(chunk.as_bytes(), now);
            }
        }

        self.engine.close_capture(CloseReason::Disconnected);
        self.events.emit(CaptureEvent::Disconnected);
    }

    /// Run one tick now
    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    /// Drain the reader channel and apply the silence policy at `now`
    ///
    /// A reader failure ends the session.
    pub fn on_tick_at(&mut self, now: Instant) {
        let outcome = match &self.session {
            Some(session) => self.engine.on_tick_at(&session.items, now),
            None => {
                self.engine.check_silence_at(now);
                TickOutcome::Continue
            }
        };

        if let TickOutcome::ReaderFailed(reason) = outcome {
            tracing::debug!("Ending session after reader failure: {}", reason);
            self.disconnect();
        }
    }

    fn report_connect_failure(&self, port: &str, err: &MonitorError) {
        self.events.emit(CaptureEvent::ConnectFailed {
            port: port.to_string(),
            reason: err.to_string(),
        });
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.disconnect();
    }
}
