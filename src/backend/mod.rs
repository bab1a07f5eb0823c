//! Backend module for serial reading
//!
//! This module handles all serial I/O on a separate thread so the capture
//! engine and UI never block on the transport. Bytes cross the thread
//! boundary as immutable [`Chunk`](crate::types::Chunk)s over a crossbeam
//! channel.
//!
//! # Components
//!
//! - [`ByteSource`] - Trait for an opened transport (serial port or mock)
//! - [`SourceOpener`] - Trait used by the session to open a [`ByteSource`]
//! - [`SerialByteSource`] / [`SerialOpener`] - `serialport`-backed transport
//! - [`ReaderTask`] - Loop that drains a source and forwards chunks
//! - [`ReaderHandle`] - Owner-side stop/join handle for the reader thread
//! - [`ScriptedSource`] - Scripted source for testing (feature-gated)
//!
//! # Example
//!
//! ```ignore
//! use rs232mon::backend::{ReaderHandle, SerialOpener, SourceOpener};
//! use rs232mon::config::SerialSettings;
//!
//! let settings = SerialSettings::with_baud(19200);
//! let source = SerialOpener.open("/dev/ttyUSB0", &settings)?;
//! let (reader, items) = ReaderHandle::spawn(source, settings.read_timeout)?;
//!
//! for item in items.try_iter() {
//!     // Feed chunks to the capture engine
//! }
//!
//! reader.stop_and_join(Duration::from_secs(2));
//! ```

pub mod byte_source;
#[cfg(any(test, feature = "mock-source"))]
pub mod mock_source;
pub mod reader;
pub mod serial;

pub use byte_source::{ByteSource, SourceOpener};
#[cfg(any(test, feature = "mock-source"))]
pub use mock_source::{DemoOpener, MockOpener, MockStep, ScriptedSource, MOCK_PORT_NAME};
pub use reader::{ReaderHandle, ReaderItem, ReaderTask};
pub use serial::{list_ports, PortInfo, SerialByteSource, SerialOpener};
