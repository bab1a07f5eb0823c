//! Mock construction helpers

use crossbeam_channel::{unbounded, Receiver, Sender};
use rs232mon::backend::ReaderItem;
use rs232mon::types::Chunk;

#[cfg(feature = "mock-source")]
use rs232mon::backend::{MockOpener, MockStep};

/// Channel standing in for a reader task
pub fn create_item_channel() -> (Sender<ReaderItem>, Receiver<ReaderItem>) {
    unbounded()
}

/// Queue `bytes` as one chunk
pub fn send_chunk(tx: &Sender<ReaderItem>, bytes: &[u8]) {
    if let Some(chunk) = Chunk::new(bytes.to_vec()) {
        let _ = tx.send(ReaderItem::Chunk(chunk));
    }
}

/// Opener replaying two bursts separated by `gap`
#[cfg(feature = "mock-source")]
pub fn create_two_burst_opener(gap: std::time::Duration) -> MockOpener {
    MockOpener::new(vec![
        MockStep::data("t,v\r\n1,10\r\n"),
        MockStep::Idle(gap),
        MockStep::data("t,v\r\n2,20\r\n"),
    ])
}
