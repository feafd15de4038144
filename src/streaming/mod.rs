//! Outbound framing and pacing.
//!
//! ```text
//! SampleBuffer ──▶ Chunker ──▶ Frame 0, Frame 1, … ──▶ FramePacer ──▶ mpsc ──▶ upload flow
//!                                                          │
//!                                                          └── Flush (after last frame)
//! ```

pub mod chunker;
pub mod frame;
pub mod pacer;

pub use chunker::Chunker;
pub use frame::{Frame, Outbound};
pub use pacer::{FramePacer, PaceOutcome};
