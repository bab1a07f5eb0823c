//! Capture engine integration tests
//!
//! These drive the engine through its tick interface with a hand-fed item
//! channel and explicit timestamps, then check the files left on disk.

mod common;

use common::builders::ConfigBuilder;
use common::mock_helpers::{create_item_channel, send_chunk};
use rs232mon::backend::ReaderItem;
use rs232mon::capture::{CaptureEngine, TickOutcome};
use rs232mon::events::{event_channel, CaptureEvent, EventReceiver};
use rs232mon::types::CloseReason;
use std::path::Path;
use std::time::{Duration, Instant};

fn engine_in(dir: &Path) -> (CaptureEngine, EventReceiver) {
    let (tx, rx) = event_channel();
    let settings = ConfigBuilder::new(dir).capture_settings();
    (CaptureEngine::new(&settings, tx), rx)
}

fn close_reasons(events: &[CaptureEvent]) -> Vec<CloseReason> {
    events
        .iter()
        .filter_map(|e| match e {
            CaptureEvent::FileClosed { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect()
}

#[test]
fn test_two_bursts_make_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, events) = engine_in(dir.path());
    let (tx, rx) = create_item_channel();
    let t0 = Instant::now();

    send_chunk(&tx, b"t,v\r\n1,10\r\n");
    engine.on_tick_at(&rx, t0);
    engine.on_tick_at(&rx, t0 + Duration::from_millis(2100));
    assert!(!engine.is_capturing());

    send_chunk(&tx, b"t,v\r\n2,20\r\n");
    engine.on_tick_at(&rx, t0 + Duration::from_millis(2200));
    engine.close_capture(CloseReason::Disconnected);

    let contents = common::capture_contents(dir.path());
    assert_eq!(contents.len(), 2);
    assert!(contents.contains(&"t,v\n1,10\n".to_string()));
    assert!(contents.contains(&"t,v\n2,20\n".to_string()));
    assert_eq!(
        close_reasons(&events.drain()),
        vec![CloseReason::Silence, CloseReason::Disconnected]
    );
}

#[test]
fn test_steady_traffic_stays_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, _events) = engine_in(dir.path());
    let (tx, rx) = create_item_channel();
    let t0 = Instant::now();

    // One line every second for ten seconds never reaches the threshold
    for second in 0..10u64 {
        send_chunk(&tx, format!("{},{}\n", second, second * 2).as_bytes());
        engine.on_tick_at(&rx, t0 + Duration::from_secs(second));
        assert!(engine.is_capturing());
    }
    engine.close_capture(CloseReason::Disconnected);

    assert_eq!(engine.stats().files_opened, 1);
    assert_eq!(common::capture_files(dir.path()).len(), 1);
    assert_eq!(engine.stats().lines_written, 10);
}

#[test]
fn test_line_split_across_chunks_and_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, _events) = engine_in(dir.path());
    let (tx, rx) = create_item_channel();
    let t0 = Instant::now();

    send_chunk(&tx, b"12.5,");
    engine.on_tick_at(&rx, t0);
    send_chunk(&tx, b"13.0\r");
    engine.on_tick_at(&rx, t0 + Duration::from_millis(50));
    send_chunk(&tx, b"\n14.0,1\n");
    engine.on_tick_at(&rx, t0 + Duration::from_millis(100));

    let path = engine.current_file().unwrap().to_path_buf();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "12.5,13.0\n14.0,1\n");
}

#[test]
fn test_disconnect_keeps_committed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, events) = engine_in(dir.path());

    engine.ingest(b"a,1\nb,2\npartial");
    engine.close_capture(CloseReason::Disconnected);

    let path = engine.last_file().unwrap().to_path_buf();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "a,1\nb,2\n");
    assert_eq!(close_reasons(&events.drain()), vec![CloseReason::Disconnected]);
}

#[test]
fn test_at_most_one_file_open() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, events) = engine_in(dir.path());
    let t0 = Instant::now();

    for i in 0..50u64 {
        engine.ingest_at(b"x\n", t0 + Duration::from_millis(i * 10));
    }

    let opened = events
        .drain()
        .iter()
        .filter(|e| matches!(e, CaptureEvent::FileOpened { .. }))
        .count();
    assert_eq!(opened, 1);
}

#[test]
fn test_error_item_ends_tick() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, _events) = engine_in(dir.path());
    let (tx, rx) = create_item_channel();

    send_chunk(&tx, b"before\n");
    tx.send(ReaderItem::Failed("framing error".into())).unwrap();
    send_chunk(&tx, b"after\n");

    let outcome = engine.on_tick_at(&rx, Instant::now());
    assert_eq!(outcome, TickOutcome::ReaderFailed("framing error".into()));

    let path = engine.current_file().unwrap().to_path_buf();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "before\n");
}

#[test]
fn test_output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b");
    let (mut engine, _events) = engine_in(&out);

    engine.ingest(b"1\n");
    assert!(out.is_dir());
    assert_eq!(common::capture_files(&out).len(), 1);
}
