//! ByteSource trait for the serial transport
//!
//! This module provides the seam between the reader task and whatever
//! delivers bytes: a real serial port via `serialport`, or the scripted
//! source used when testing without hardware.

use crate::config::SerialSettings;
use crate::error::Result;
use std::time::Duration;

/// An opened connection that yields raw bytes
///
/// Implementations must be `Send` so the source can move onto the reader
/// thread, which then owns it exclusively until it exits.
#[cfg_attr(test, mockall::automock)]
pub trait ByteSource: Send {
    /// Number of bytes that can be read without waiting
    ///
    /// This is best-effort: 0 is a valid answer for "none" or "unknown".
    fn available_bytes(&mut self) -> Result<usize>;

    /// Read at most `max` bytes, waiting no longer than `timeout`
    ///
    /// Returns fewer bytes than requested, or none at all, when the timeout
    /// elapses. Errors are transport failures and end the session.
    fn read_up_to(&mut self, max: usize, timeout: Duration) -> Result<Vec<u8>>;

    /// Release the underlying transport
    ///
    /// Reads after `close` fail.
    fn close(&mut self);
}

/// Opens byte sources for the connect command
///
/// # Example
///
/// ```ignore
/// let source = opener.open("/dev/ttyUSB0", &SerialSettings::with_baud(19200))?;
/// ```
pub trait SourceOpener {
    /// Open `port` with the given parameters (8 data bits, no parity, 1 stop bit)
    fn open(&self, port: &str, settings: &SerialSettings) -> Result<Box<dyn ByteSource>>;
}
