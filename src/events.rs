//! User-visible events emitted by the monitor
//!
//! Every state transition (connect, disconnect, file open, file close, any
//! error) becomes a [`CaptureEvent`]. Events are logged through `tracing` as
//! they are emitted and queued on a crossbeam channel for the presentation
//! layer, which adds timestamps when it displays them.

use crate::types::CloseReason;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use std::path::{Path, PathBuf};

/// A state transition or failure worth showing to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Serial port opened and reader started
    Connected { port: String, baud: u32 },
    /// Serial port could not be opened
    ConnectFailed { port: String, reason: String },
    /// Session ended
    Disconnected,
    /// A new capture file was created
    FileOpened { path: PathBuf },
    /// A capture file could not be created
    FileOpenFailed { reason: String },
    /// A capture file was closed
    FileClosed { path: PathBuf, reason: CloseReason },
    /// Writing or flushing a capture file failed
    WriteError { reason: String },
    /// Closing a capture file failed
    CloseError { reason: String },
    /// The transport failed during a session
    SerialError { reason: String },
}

impl CaptureEvent {
    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CaptureEvent::ConnectFailed { .. }
                | CaptureEvent::FileOpenFailed { .. }
                | CaptureEvent::WriteError { .. }
                | CaptureEvent::CloseError { .. }
                | CaptureEvent::SerialError { .. }
        )
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for CaptureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureEvent::Connected { port, baud } => write!(f, "Connected {} @ {}", port, baud),
            CaptureEvent::ConnectFailed { reason, .. } => write!(f, "Connect failed: {}", reason),
            CaptureEvent::Disconnected => write!(f, "Disconnected"),
            CaptureEvent::FileOpened { path } => write!(f, "Started file {}", file_name(path)),
            CaptureEvent::FileOpenFailed { reason } => write!(f, "File open failed: {}", reason),
            CaptureEvent::FileClosed { path, reason } => {
                write!(f, "Closed file ({}): {}", reason, file_name(path))
            }
            CaptureEvent::WriteError { reason } => write!(f, "Write error: {}", reason),
            CaptureEvent::CloseError { reason } => write!(f, "Close error: {}", reason),
            CaptureEvent::SerialError { reason } => write!(f, "Serial error: {}", reason),
        }
    }
}

/// Producer side of the event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<CaptureEvent>,
}

impl EventSender {
    /// Log `event` and queue it for the presentation layer
    ///
    /// A dropped receiver is not an error; the event is still logged.
    pub fn emit(&self, event: CaptureEvent) {
        match &event {
            CaptureEvent::SerialError { .. } | CaptureEvent::ConnectFailed { .. } => {
                tracing::error!("{}", event)
            }
            e if e.is_error() => tracing::warn!("{}", event),
            _ => tracing::info!("{}", event),
        }
        let _ = self.sender.send(event);
    }
}

/// Consumer side of the event channel
#[derive(Debug)]
pub struct EventReceiver {
    receiver: Receiver<CaptureEvent>,
}

impl EventReceiver {
    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<CaptureEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending events
    pub fn drain(&self) -> Vec<CaptureEvent> {
        self.receiver.try_iter().collect()
    }
}

/// Create a connected sender/receiver pair
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (EventSender { sender }, EventReceiver { receiver })
}
