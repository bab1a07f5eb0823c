//! Capture engine: chunks in, rotated line files out
//!
//! The engine runs on the presentation thread and is the only owner of the
//! reassembly buffer, the open capture file and the last-activity timestamp,
//! so none of them need locking.
//!
//! # File lifecycle
//!
//! ```text
//!            first byte of a burst            silence / disconnect / error
//!   Idle ───────────────────────────▶ Open ──────────────────────────────▶ Idle
//! ```
//!
//! A file is opened lazily when data arrives and none is open. It is closed
//! when the silence threshold passes without new bytes, when the session
//! ends, or when a write fails.
//!
//! # Time
//!
//! Every time-dependent operation has an `_at` form taking an [`Instant`] so
//! silence behavior can be exercised without sleeping.

use super::file::{CaptureFile, CaptureOpener, FileNaming};
use super::reassembly::LineAssembler;
use crate::backend::ReaderItem;
use crate::config::CaptureSettings;
use crate::error::MonitorError;
use crate::events::{CaptureEvent, EventSender};
use crate::types::{CaptureStats, CloseReason};
use crossbeam_channel::{Receiver, TryRecvError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Whether a capture file is currently open
#[derive(Debug, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Open(CaptureFile),
}

impl CaptureState {
    pub fn is_open(&self) -> bool {
        matches!(self, CaptureState::Open(_))
    }
}

/// Result of one drain/silence tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep the session running
    Continue,
    /// The reader reported a transport failure; the session must end
    ReaderFailed(String),
}

/// Converts chunks into committed lines and manages capture files
pub struct CaptureEngine {
    output_dir: PathBuf,
    silence_threshold: Duration,
    opener: Box<dyn CaptureOpener>,
    state: CaptureState,
    assembler: LineAssembler,
    last_activity: Option<Instant>,
    last_file: Option<PathBuf>,
    stats: CaptureStats,
    events: EventSender,
}

impl CaptureEngine {
    /// Create an engine writing timestamped files per `settings`
    pub fn new(settings: &CaptureSettings, events: EventSender) -> Self {
        let naming = FileNaming::new(&settings.file_prefix, &settings.file_extension);
        Self {
            output_dir: settings.output_dir.clone(),
            silence_threshold: settings.silence_threshold,
            opener: Box::new(naming),
            state: CaptureState::Idle,
            assembler: LineAssembler::new(),
            last_activity: None,
            last_file: None,
            stats: CaptureStats::default(),
            events,
        }
    }

    /// Replace the file opener
    pub fn with_opener(mut self, opener: Box<dyn CaptureOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state.is_open()
    }

    /// Path of the file currently open, if any
    pub fn current_file(&self) -> Option<&Path> {
        match &self.state {
            CaptureState::Open(file) => Some(file.path()),
            CaptureState::Idle => None,
        }
    }

    /// Path of the most recently closed file
    pub fn last_file(&self) -> Option<&Path> {
        self.last_file.as_deref()
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    /// Unterminated bytes waiting for a separator
    pub fn pending(&self) -> &[u8] {
        self.assembler.pending()
    }

    pub fn last_activity(&self) -> Option<Instant> {
        self.last_activity
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Change where the next capture file is created
    ///
    /// A file already open stays where it is.
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = dir.into();
    }

    pub fn silence_threshold(&self) -> Duration {
        self.silence_threshold
    }

    /// Drain `items` and apply the silence policy
    pub fn on_tick(&mut self, items: &Receiver<ReaderItem>) -> TickOutcome {
        self.on_tick_at(items, Instant::now())
    }

    /// [`on_tick`](Self::on_tick) at an explicit time
    ///
    /// Stops draining at the first failure item and skips the silence check,
    /// since the caller is about to end the session.
    pub fn on_tick_at(&mut self, items: &Receiver<ReaderItem>, now: Instant) -> TickOutcome {
        loop {
            match items.try_recv() {
                Ok(ReaderItem::Chunk(chunk)) => self.ingest_at(chunk.as_bytes(), now),
                Ok(ReaderItem::Failed(reason)) => {
                    self.events.emit(CaptureEvent::SerialError {
                        reason: reason.clone(),
                    });
                    return TickOutcome::ReaderFailed(reason);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let reason = "reader task exited unexpectedly".to_string();
                    self.events.emit(CaptureEvent::SerialError {
                        reason: reason.clone(),
                    });
                    return TickOutcome::ReaderFailed(reason);
                }
            }
        }

        self.check_silence_at(now);
        TickOutcome::Continue
    }

    /// Close the open file if no bytes arrived for the silence threshold
    ///
    /// Returns true if a file was closed.
    pub fn check_silence_at(&mut self, now: Instant) -> bool {
        if !self.state.is_open() {
            return false;
        }
        let silent = self
            .last_activity
            .map(|last| now.saturating_duration_since(last) >= self.silence_threshold)
            .unwrap_or(false);
        if silent {
            self.close_capture(CloseReason::Silence);
        }
        silent
    }

    /// Feed one chunk received now
    pub fn ingest(&mut self, bytes: &[u8]) {
        self.ingest_at(bytes, Instant::now());
    }

    /// Feed one chunk received at `now`
    ///
    /// If no file is open one is created first. When that fails the chunk is
    /// dropped and the buffer is left untouched; the next chunk retries.
    pub fn ingest_at(&mut self, bytes: &[u8], now: Instant) {
        self.last_activity = Some(now);
        self.stats.bytes_received += bytes.len() as u64;

        if !self.state.is_open() && !self.open_capture() {
            self.stats.dropped_chunks += 1;
            return;
        }

        let lines = self.assembler.push(bytes);
        let CaptureState::Open(file) = &mut self.state else {
            return;
        };

        // Lines count as written only once the flush has succeeded
        let mut written = 0u64;
        let mut failure = None;
        for line in lines.iter().filter(|line| !line.is_empty()) {
            let text = String::from_utf8_lossy(line);
            if let Err(e) = file.write_line(&text) {
                failure = Some(e);
                break;
            }
            written += 1;
        }
        if failure.is_none() {
            match file.flush() {
                Ok(()) => self.stats.lines_written += written,
                Err(e) => failure = Some(e),
            }
        }

        if let Some(e) = failure {
            self.stats.write_errors += 1;
            self.events.emit(CaptureEvent::WriteError {
                reason: e.to_string(),
            });
            self.close_capture(CloseReason::Error);
        }
    }

    /// Close the open file (if any) and reset burst state
    ///
    /// The buffer and last-activity timestamp are cleared even when no file
    /// is open, so calling this twice is harmless. A file closed for
    /// [`CloseReason::Error`] is not flushed again; the write error already
    /// reported the failure.
    pub fn close_capture(&mut self, reason: CloseReason) {
        if let CaptureState::Open(file) = std::mem::take(&mut self.state) {
            let path = if reason == CloseReason::Error {
                file.abandon()
            } else {
                let (path, result) = file.close();
                if let Err(e) = result {
                    self.events.emit(CaptureEvent::CloseError {
                        reason: e.to_string(),
                    });
                }
                path
            };
            self.stats.files_closed += 1;
            self.events.emit(CaptureEvent::FileClosed {
                path: path.clone(),
                reason,
            });
            self.last_file = Some(path);
        }
        self.assembler.clear();
        self.last_activity = None;
    }

    fn open_capture(&mut self) -> bool {
        match self.opener.open(&self.output_dir) {
            Ok(file) => {
                self.events.emit(CaptureEvent::FileOpened {
                    path: file.path().to_path_buf(),
                });
                self.stats.files_opened += 1;
                self.state = CaptureState::Open(file);
                true
            }
            Err(source) => {
                let err = MonitorError::FileOpen {
                    path: self.output_dir.clone(),
                    source,
                };
                self.events.emit(CaptureEvent::FileOpenFailed {
                    reason: err.to_string(),
                });
                false
            }
        }
    }
}

impl Drop for CaptureEngine {
    fn drop(&mut self) {
        if self.state.is_open() {
            self.close_capture(CloseReason::Disconnected);
        }
    }
}
