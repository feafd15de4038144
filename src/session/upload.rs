//! Write half of a session.
//!
//! Turns paced [`Outbound`] items into WebSocket messages in order, with the
//! flush marker last. A write error ends the upload but not the session;
//! the receive flow keeps collecting results.

use super::protocol::outbound_message;
use super::{SessionState, UploadSummary};
use crate::error::ScribeError;
use crate::streaming::Outbound;
use futures_util::{Sink, SinkExt};
use std::fmt::Display;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

/// Forward outbound items to the write half until the flush marker goes out,
/// the producer hangs up or a write fails.
///
/// Always signals `done` before returning, and hands the write half back so
/// the caller can reunite it with the read half.
pub(super) async fn upload_flow<W>(
    mut writer: W,
    mut outbound: mpsc::Receiver<Outbound>,
    state: watch::Receiver<SessionState>,
    done: watch::Sender<bool>,
) -> (W, UploadSummary, Option<ScribeError>)
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let mut summary = UploadSummary::default();
    let mut error = None;

    while let Some(item) = outbound.recv().await {
        if *state.borrow() >= SessionState::Closing {
            error = Some(ScribeError::Transport {
                message: "session is closing".to_string(),
            });
            break;
        }

        let message = outbound_message(&item);
        if let Err(e) = writer.send(message).await {
            log::warn!("Upload stopped after {} frames: {}", summary.frames_sent, e);
            error = Some(ScribeError::Transport {
                message: e.to_string(),
            });
            break;
        }

        match item {
            Outbound::Frame(frame) => {
                summary.frames_sent += 1;
                summary.samples_sent += frame.samples.len() as u64;
                log::trace!(
                    "Sent frame {} ({} samples)",
                    frame.sequence,
                    frame.samples.len()
                );
            }
            Outbound::Flush => {
                summary.flushed = true;
                log::debug!("Sent flush after {} frames", summary.frames_sent);
                break;
            }
        }
    }

    done.send_replace(true);
    (writer, summary, error)
}
