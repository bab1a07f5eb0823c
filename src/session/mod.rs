//! Session lifecycle
//!
//! A session is one connect-to-disconnect lifetime of a serial port. The
//! [`Monitor`] owns at most one of them together with the capture engine and
//! is the only type the presentation layer talks to.
//!
//! # Control flow
//!
//! - `connect(port, baud)` opens the transport and spawns the reader thread
//! - `on_tick()` drains queued chunks into the engine and applies the
//!   silence policy; a reader failure ends the session
//! - `disconnect()` stops the reader with a bounded wait, commits whatever it
//!   already queued, then closes the capture file

pub mod monitor;

pub use monitor::Monitor;
