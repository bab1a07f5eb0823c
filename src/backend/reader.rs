//! Reader Thread Implementation
//!
//! This module contains the loop that runs on a dedicated thread and drains
//! the byte source. It forwards each non-empty read as a [`Chunk`] over a
//! crossbeam channel to the capture engine.
//!
//! # Termination
//!
//! The loop ends in one of two ways:
//!
//! - **Stop requested**: the owner sets the stop flag; the loop exits after
//!   its current iteration (at most one read timeout later).
//! - **Transport error**: a [`ReaderItem::Failed`] is sent and the loop
//!   exits. It is always the last item the reader enqueues.
//!
//! Either way the thread closes the byte source itself before exiting, so the
//! source is never closed while a read is in flight.

use super::byte_source::ByteSource;
use crate::types::Chunk;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Item sent from the reader thread to the capture engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderItem {
    /// Bytes from one read
    Chunk(Chunk),
    /// The transport failed; no further items follow
    Failed(String),
}

/// The loop that pulls bytes from a [`ByteSource`]
pub struct ReaderTask {
    source: Box<dyn ByteSource>,
    items: Sender<ReaderItem>,
    stop: Arc<AtomicBool>,
    read_timeout: Duration,
}

impl ReaderTask {
    pub fn new(
        source: Box<dyn ByteSource>,
        items: Sender<ReaderItem>,
        stop: Arc<AtomicBool>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            source,
            items,
            stop,
            read_timeout,
        }
    }

    /// Run until stopped or until the transport fails
    pub fn run(mut self) {
        tracing::debug!("Reader task started");
        let mut forwarded: u64 = 0;

        while !self.stop.load(Ordering::SeqCst) {
            match self.step() {
                Ok(Some(chunk)) => {
                    forwarded += chunk.len() as u64;
                    tracing::trace!("Read {} bytes", chunk.len());
                    if self.items.send(ReaderItem::Chunk(chunk)).is_err() {
                        tracing::debug!("Capture side dropped the channel, stopping reader");
                        break;
                    }
                }
                Ok(None) => std::thread::sleep(self.read_timeout),
                Err(e) => {
                    tracing::error!("Serial read failed: {}", e);
                    let _ = self.items.send(ReaderItem::Failed(e.to_string()));
                    break;
                }
            }
        }

        self.source.close();
        tracing::debug!("Reader task stopped after {} bytes", forwarded);
    }

    /// One poll of the source: read what is available, or one byte with timeout
    fn step(&mut self) -> crate::error::Result<Option<Chunk>> {
        let available = self.source.available_bytes()?;
        let bytes = self
            .source
            .read_up_to(available.max(1), self.read_timeout)?;
        Ok(Chunk::new(bytes))
    }
}

/// Owner-side handle to a running reader thread
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    done: Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

impl ReaderHandle {
    /// Spawn a reader thread for `source`
    ///
    /// Returns the handle and the receiving end of the chunk channel.
    pub fn spawn(
        source: Box<dyn ByteSource>,
        read_timeout: Duration,
    ) -> std::io::Result<(Self, Receiver<ReaderItem>)> {
        let (item_tx, item_rx) = unbounded();
        let (done_tx, done_rx) = bounded::<()>(1);
        let stop = Arc::new(AtomicBool::new(false));

        let task = ReaderTask::new(source, item_tx, stop.clone(), read_timeout);
        let thread = std::thread::Builder::new()
            .name("rs232mon-reader".to_string())
            .spawn(move || {
                task.run();
                drop(done_tx);
            })?;

        Ok((
            Self {
                stop,
                done: done_rx,
                thread: Some(thread),
            },
            item_rx,
        ))
    }

    /// Whether the thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the thread to stop and wait up to `timeout` for it to exit
    ///
    /// Returns `true` if the thread exited in time. Otherwise it is detached;
    /// it closes its source once it observes the stop flag.
    pub fn stop_and_join(mut self, timeout: Duration) -> bool {
        self.stop.store(true, Ordering::SeqCst);

        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(thread) = self.thread.take() {
                    if thread.join().is_err() {
                        tracing::error!("Reader thread panicked");
                    }
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Reader thread did not stop within {:?}, detaching", timeout);
                self.thread.take();
                false
            }
        }
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
