//! # rs232mon: Burst-Splitting RS-232 Monitor
//!
//! Listens on a serial port and writes each burst of line-oriented traffic
//! (typically CSV) to its own timestamped file. A burst ends when the line
//! has been silent for a configurable threshold.
//!
//! ## Architecture
//!
//! - **Backend**: A reader thread drains the serial port and forwards chunks
//! - **Capture**: Line reassembly, lazy file creation and silence rotation
//! - **Session**: Connect/disconnect lifecycle tying the two together
//! - **Frontend**: An eframe/egui window that drives the tick and shows events
//! - **Communication**: Crossbeam channels for chunks and user-visible events
//!
//! ## Configuration
//!
//! Settings are read from a TOML file given as the first argument or through
//! `RS232MON_CONFIG`. Every field has a default, so the file is optional.
//!
//! ## Example
//!
//! ```ignore
//! use rs232mon::{backend::SerialOpener, config::MonitorConfig, session::Monitor};
//!
//! let config = MonitorConfig::load_or_default(None)?;
//! let (mut monitor, events) = Monitor::new(config, Box::new(SerialOpener));
//!
//! monitor.connect("/dev/ttyUSB0", 19200)?;
//! loop {
//!     monitor.on_tick();
//!     for event in events.drain() {
//!         println!("{}", event);
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! ```

pub mod backend;
pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod frontend;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use capture::{CaptureEngine, LineAssembler};
pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use events::{CaptureEvent, EventReceiver};
pub use frontend::MonitorApp;
pub use session::Monitor;
pub use types::{CaptureStats, Chunk, CloseReason, ConnectionStatus};
