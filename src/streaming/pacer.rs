//! Real-time pacing of frames towards the upload flow.

use crate::defaults;
use crate::streaming::frame::{Frame, Outbound};
use std::time::Duration;
use tokio::sync::mpsc;

/// Result of a pacing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaceOutcome {
    /// Frames handed to the upload flow.
    pub frames: u64,
    /// Whether the flush marker was handed over after the last frame.
    pub flushed: bool,
}

/// Hands frames to the session with a fixed delay after each one, then
/// emits a single flush marker.
///
/// The delay only shapes timing; a zero delay streams as fast as the
/// channel drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    delay: Duration,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(defaults::FRAME_DELAY_MS))
    }
}

impl FramePacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Send every frame in order, then `Outbound::Flush`.
    ///
    /// Stops early (without flushing) if the receiving side goes away.
    pub async fn run<I>(&self, frames: I, tx: mpsc::Sender<Outbound>) -> PaceOutcome
    where
        I: IntoIterator<Item = Frame>,
    {
        let mut outcome = PaceOutcome::default();

        for frame in frames {
            let sequence = frame.sequence;
            if tx.send(Outbound::Frame(frame)).await.is_err() {
                log::debug!("Upload flow gone before frame {}, stopping pacer", sequence);
                return outcome;
            }
            outcome.frames += 1;

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        if tx.send(Outbound::Flush).await.is_err() {
            log::debug!("Upload flow gone before flush, stopping pacer");
            return outcome;
        }
        outcome.flushed = true;
        outcome
    }
}
