//! Core data types shared across the monitor
//!
//! This module defines the values that cross component boundaries:
//!
//! - [`Chunk`] - One non-empty read from the byte source
//! - [`CloseReason`] - Why a capture file was closed
//! - [`ConnectionStatus`] - Whether a serial session is open
//! - [`CaptureStats`] - Running counters for the status line

use std::fmt;

/// Bytes produced by a single read call on the byte source
///
/// A chunk is never empty: [`Chunk::new`] refuses empty reads so the reader
/// task cannot enqueue them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk(Vec<u8>);

impl Chunk {
    /// Wrap a read buffer, returning `None` if it holds no bytes
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reason a capture file was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// No bytes arrived for the silence threshold
    Silence,
    /// The session was ended by the user or by a transport failure
    Disconnected,
    /// A write to the file failed
    Error,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Silence => "silence",
            CloseReason::Disconnected => "disconnected",
            CloseReason::Error => "error",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection status of the serial session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No port is open
    #[default]
    Disconnected,
    /// A port is open and the reader task is running
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connected => write!(f, "Connected"),
        }
    }
}

/// Statistics about the capture process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Bytes handed to the capture engine
    pub bytes_received: u64,
    /// Non-empty lines written to capture files
    pub lines_written: u64,
    /// Capture files created
    pub files_opened: u64,
    /// Capture files closed (any reason)
    pub files_closed: u64,
    /// Chunks discarded because no file could be opened
    pub dropped_chunks: u64,
    /// Failed writes or flushes
    pub write_errors: u64,
}
