//! Session lifecycle integration tests
//!
//! Drives a [`Monitor`] end to end against the scripted byte source.
//!
//! ```bash
//! cargo test --features mock-source --test session_lifecycle_integration
//! ```

#![cfg(feature = "mock-source")]

mod common;

use common::builders::ConfigBuilder;
use common::mock_helpers::create_two_burst_opener;
use rs232mon::backend::{MockOpener, MockStep};
use rs232mon::events::CaptureEvent;
use rs232mon::session::Monitor;
use rs232mon::types::{CloseReason, ConnectionStatus};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// Tick every few milliseconds until `done` or the deadline
fn run_until(monitor: &mut Monitor, limit: Duration, done: impl Fn(&Monitor) -> bool) {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline && !done(monitor) {
        monitor.on_tick();
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_bursts_split_into_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path())
        .silence(Duration::from_millis(150))
        .build();
    let opener = create_two_burst_opener(Duration::from_millis(500));
    let (mut monitor, events) = Monitor::new(config, Box::new(opener));

    monitor.connect("COM1", 19200).unwrap();
    run_until(&mut monitor, Duration::from_secs(5), |m| {
        m.stats().files_closed >= 2
    });
    monitor.disconnect();

    assert_eq!(
        common::capture_contents(dir.path()),
        vec!["t,v\n1,10\n".to_string(), "t,v\n2,20\n".to_string()]
    );
    let reasons: Vec<CloseReason> = events
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            CaptureEvent::FileClosed { reason, .. } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(reasons, vec![CloseReason::Silence, CloseReason::Silence]);
}

#[test]
fn test_disconnect_closes_transport_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).build();
    let opener = MockOpener::new(vec![MockStep::data("1,2\n3,")]);
    let (mut monitor, events) = Monitor::new(config, Box::new(opener.clone()));

    monitor.connect("/dev/ttyS0", 115200).unwrap();
    run_until(&mut monitor, Duration::from_secs(2), |m| m.stats().lines_written >= 1);
    assert!(monitor.current_file().is_some());

    monitor.disconnect();
    assert_eq!(monitor.status(), ConnectionStatus::Disconnected);
    assert!(monitor.current_file().is_none());
    assert!(opener.last_closed_flag().unwrap().load(Ordering::SeqCst));

    let path = monitor.last_file().unwrap().to_path_buf();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "1,2\n");
    assert!(events.drain().iter().any(|e| matches!(
        e,
        CaptureEvent::FileClosed {
            reason: CloseReason::Disconnected,
            ..
        }
    )));
}

#[test]
fn test_transport_failure_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).build();
    let opener = MockOpener::new(vec![
        MockStep::data("ok\n"),
        MockStep::Fail("cable pulled".into()),
    ]);
    let (mut monitor, events) = Monitor::new(config, Box::new(opener.clone()));

    monitor.connect("COM2", 19200).unwrap();
    run_until(&mut monitor, Duration::from_secs(2), |m| !m.is_connected());

    assert!(!monitor.is_connected());
    assert!(opener.last_closed_flag().unwrap().load(Ordering::SeqCst));
    let events = events.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, CaptureEvent::SerialError { reason } if reason.contains("cable pulled"))));
    assert_eq!(events.last(), Some(&CaptureEvent::Disconnected));

    // The port can be reopened after the failure
    monitor.connect("COM2", 19200).unwrap();
    assert!(monitor.is_connected());
}

#[test]
fn test_reconnect_after_disconnect() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).build();
    let opener = MockOpener::new(vec![]);
    let (mut monitor, _events) = Monitor::new(config, Box::new(opener.clone()));

    monitor.connect("COM1", 9600).unwrap();
    monitor.disconnect();
    monitor.connect("COM1", 38400).unwrap();
    monitor.disconnect();

    assert_eq!(
        opener.opened(),
        vec![("COM1".to_string(), 9600), ("COM1".to_string(), 38400)]
    );
}

#[test]
fn test_drop_disconnects() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).build();
    let opener = MockOpener::new(vec![MockStep::data("z\n")]);
    let (mut monitor, _events) = Monitor::new(config, Box::new(opener.clone()));

    monitor.connect("COM1", 19200).unwrap();
    run_until(&mut monitor, Duration::from_secs(2), |m| m.stats().lines_written >= 1);
    drop(monitor);

    assert!(opener.last_closed_flag().unwrap().load(Ordering::SeqCst));
    assert_eq!(common::capture_contents(dir.path()), vec!["z\n".to_string()]);
}
