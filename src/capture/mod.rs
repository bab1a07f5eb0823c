//! Burst capture: line reassembly, file rotation and the tick schedule
//!
//! - [`LineAssembler`] - Reassembles lines split across chunk boundaries
//! - [`CaptureFile`] / [`FileNaming`] - Timestamped output files
//! - [`CaptureEngine`] - Owns the buffer and open file, applies the silence policy
//! - [`Ticker`] - Fixed-interval tick gate for the host event loop

pub mod engine;
pub mod file;
pub mod reassembly;
pub mod ticker;

pub use engine::{CaptureEngine, CaptureState, TickOutcome};
pub use file::{CaptureFile, CaptureOpener, FileNaming};
pub use reassembly::LineAssembler;
pub use ticker::Ticker;
