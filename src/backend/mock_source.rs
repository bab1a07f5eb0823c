//! Scripted Byte Source for Testing
//!
//! This module provides a byte source that replays a fixed script instead of
//! talking to hardware. It lets sessions be driven end to end in tests.
//!
//! # Script Steps
//!
//! - [`MockStep::Data`] - Bytes made available for reading
//! - [`MockStep::Idle`] - A quiet period; reads time out until it has elapsed
//! - [`MockStep::Fail`] - The next read fails with the given message
//!
//! Once the script is exhausted the source stays idle forever.
//!
//! # Example
//!
//! ```ignore
//! use rs232mon::backend::mock_source::{MockOpener, MockStep};
//!
//! let opener = MockOpener::new(vec![
//!     MockStep::data("t,v\r\n1,2\r\n"),
//!     MockStep::Idle(Duration::from_millis(300)),
//!     MockStep::Fail("device unplugged".into()),
//! ]);
//! ```
//!
//! # Enabling
//!
//! The scripted source is compiled for unit tests, and for everything else
//! when the `mock-source` feature is enabled:
//!
//! ```bash
//! cargo test --features mock-source
//! ```

use super::byte_source::{ByteSource, SourceOpener};
use super::serial::{PortInfo, SerialOpener};
use crate::config::SerialSettings;
use crate::error::{MonitorError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One step of a mock transmission
#[derive(Debug, Clone, PartialEq)]
pub enum MockStep {
    /// Bytes that become readable
    Data(Vec<u8>),
    /// Quiet period
    Idle(Duration),
    /// Transport failure
    Fail(String),
}

impl MockStep {
    pub fn data(bytes: impl AsRef<[u8]>) -> Self {
        MockStep::Data(bytes.as_ref().to_vec())
    }
}

/// Byte source that replays a [`MockStep`] script
#[derive(Debug)]
pub struct ScriptedSource {
    steps: VecDeque<MockStep>,
    idle_until: Option<Instant>,
    closed: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = MockStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            idle_until: None,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag set once [`ByteSource::close`] has run
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }

    /// Advance past an Idle step whose deadline has passed
    fn settle_idle(&mut self) -> Option<Duration> {
        let Some(MockStep::Idle(period)) = self.steps.front() else {
            return None;
        };
        let deadline = *self.idle_until.get_or_insert_with(|| Instant::now() + *period);
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            self.steps.pop_front();
            self.idle_until = None;
            None
        } else {
            Some(remaining)
        }
    }
}

impl ByteSource for ScriptedSource {
    fn available_bytes(&mut self) -> Result<usize> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MonitorError::NotConnected);
        }
        let _ = self.settle_idle();
        Ok(match self.steps.front() {
            Some(MockStep::Data(bytes)) => bytes.len(),
            _ => 0,
        })
    }

    fn read_up_to(&mut self, max: usize, timeout: Duration) -> Result<Vec<u8>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MonitorError::NotConnected);
        }

        if let Some(remaining) = self.settle_idle() {
            std::thread::sleep(remaining.min(timeout));
            return Ok(Vec::new());
        }

        match self.steps.front_mut() {
            Some(MockStep::Data(bytes)) => {
                let take = max.max(1).min(bytes.len());
                let out: Vec<u8> = bytes.drain(..take).collect();
                if bytes.is_empty() {
                    self.steps.pop_front();
                }
                Ok(out)
            }
            Some(MockStep::Fail(message)) => {
                let message = message.clone();
                self.steps.pop_front();
                Err(MonitorError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    message,
                )))
            }
            Some(MockStep::Idle(_)) | None => {
                std::thread::sleep(timeout);
                Ok(Vec::new())
            }
        }
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Opener that hands out [`ScriptedSource`]s
///
/// Each open replays the same script. Ports listed with
/// [`MockOpener::failing_port`] refuse to open.
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    script: Vec<MockStep>,
    failing_ports: Vec<String>,
    opened: Arc<Mutex<Vec<(String, u32)>>>,
    last_closed: Arc<Mutex<Option<Arc<AtomicBool>>>>,
}

impl MockOpener {
    pub fn new(script: Vec<MockStep>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Make `port` fail to open
    pub fn failing_port(mut self, port: impl Into<String>) -> Self {
        self.failing_ports.push(port.into());
        self
    }

    /// Ports and baud rates opened so far
    pub fn opened(&self) -> Vec<(String, u32)> {
        self.opened.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Closed flag of the most recently opened source
    pub fn last_closed_flag(&self) -> Option<Arc<AtomicBool>> {
        self.last_closed.lock().ok().and_then(|v| v.clone())
    }
}

impl SourceOpener for MockOpener {
    fn open(&self, port: &str, settings: &SerialSettings) -> Result<Box<dyn ByteSource>> {
        if self.failing_ports.iter().any(|p| p == port) {
            return Err(MonitorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not available", port),
            )));
        }

        let source = ScriptedSource::new(self.script.clone());
        if let Ok(mut opened) = self.opened.lock() {
            opened.push((port.to_string(), settings.baud_rate));
        }
        if let Ok(mut last) = self.last_closed.lock() {
            *last = Some(source.closed_flag());
        }
        Ok(Box::new(source))
    }
}

/// Port name routed to the demo script by [`DemoOpener`]
pub const MOCK_PORT_NAME: &str = "MOCK";

/// Two short CSV bursts separated by a gap longer than the default silence
pub fn demo_script() -> Vec<MockStep> {
    vec![
        MockStep::data("time,temp,rh\r\n0,21.4,40\r\n1,21.5,41\r\n"),
        MockStep::data("2,21.5,41\r\n"),
        MockStep::Idle(Duration::from_secs(3)),
        MockStep::data("time,temp,rh\r\n0,22.0,39\r\n"),
    ]
}

/// Entry listed next to real ports when running without hardware
pub fn mock_port_info() -> PortInfo {
    PortInfo {
        name: MOCK_PORT_NAME.to_string(),
        kind: "Mock".to_string(),
        description: Some("scripted demo source".to_string()),
    }
}

/// Opener that serves [`MOCK_PORT_NAME`] from a script and everything else
/// from real hardware
#[derive(Debug, Clone)]
pub struct DemoOpener {
    mock: MockOpener,
    serial: SerialOpener,
}

impl DemoOpener {
    pub fn new(script: Vec<MockStep>) -> Self {
        Self {
            mock: MockOpener::new(script),
            serial: SerialOpener,
        }
    }
}

impl Default for DemoOpener {
    fn default() -> Self {
        Self::new(demo_script())
    }
}

impl SourceOpener for DemoOpener {
    fn open(&self, port: &str, settings: &SerialSettings) -> Result<Box<dyn ByteSource>> {
        if port == MOCK_PORT_NAME {
            tracing::info!("Opening scripted source for {}", port);
            self.mock.open(port, settings)
        } else {
            self.serial.open(port, settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(5);

    #[test]
    fn test_data_is_served_in_pieces() {
        let mut source = ScriptedSource::new(vec![MockStep::data("abcdef")]);
        assert_eq!(source.available_bytes().unwrap(), 6);
        assert_eq!(source.read_up_to(4, TIMEOUT).unwrap(), b"abcd");
        assert_eq!(source.available_bytes().unwrap(), 2);
        assert_eq!(source.read_up_to(4, TIMEOUT).unwrap(), b"ef");
        assert_eq!(source.available_bytes().unwrap(), 0);
        assert!(source.read_up_to(4, TIMEOUT).unwrap().is_empty());
    }

    #[test]
    fn test_idle_then_data() {
        let mut source = ScriptedSource::new(vec![
            MockStep::Idle(Duration::from_millis(20)),
            MockStep::data("x"),
        ]);
        assert!(source.read_up_to(1, TIMEOUT).unwrap().is_empty());
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(source.read_up_to(1, TIMEOUT).unwrap(), b"x");
    }

    #[test]
    fn test_fail_step() {
        let mut source = ScriptedSource::new(vec![MockStep::Fail("unplugged".into())]);
        let err = source.read_up_to(1, TIMEOUT).unwrap_err();
        assert!(err.to_string().contains("unplugged"));
    }

    #[test]
    fn test_close_sets_flag_and_fails_reads() {
        let mut source = ScriptedSource::new(vec![MockStep::data("abc")]);
        let closed = source.closed_flag();
        source.close();
        assert!(closed.load(Ordering::SeqCst));
        assert!(source.read_up_to(1, TIMEOUT).is_err());
    }

    #[test]
    fn test_opener_records_and_fails() {
        let opener = MockOpener::new(vec![]).failing_port("COM9");
        assert!(opener.open("COM9", &SerialSettings::default()).is_err());
        assert!(opener.open("COM1", &SerialSettings::with_baud(9600)).is_ok());
        assert_eq!(opener.opened(), vec![("COM1".to_string(), 9600)]);
        assert!(opener.last_closed_flag().is_some());
    }

    #[test]
    fn test_demo_opener_routes_mock_port() {
        let opener = DemoOpener::new(vec![MockStep::data("a\n")]);
        let mut source = opener
            .open(MOCK_PORT_NAME, &SerialSettings::default())
            .unwrap();
        assert_eq!(source.read_up_to(8, TIMEOUT).unwrap(), b"a\n");
    }

    #[test]
    fn test_demo_script_has_two_bursts() {
        let gaps = demo_script()
            .iter()
            .filter(|s| matches!(s, MockStep::Idle(d) if *d > crate::config::DEFAULT_SILENCE_THRESHOLD))
            .count();
        assert_eq!(gaps, 1);
    }
}
