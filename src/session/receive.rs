//! Read half of a session.
//!
//! Every inbound data message is decoded and handed to the result sink as
//! it arrives, interleaved with the upload.

use super::{ReceiveEnd, ReceiveSummary, SessionState, advance};
use crate::results::{ResultSink, decode};
use futures_util::{Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tokio_tungstenite::tungstenite::Message;

/// Decode inbound messages into the sink until the peer closes, a read
/// fails, or `result_timeout` elapses after the upload has finished.
///
/// The deadline is armed once, when `upload_done` flips (or its sender goes
/// away), and is not extended by later messages.
pub(super) async fn receive_flow<R, E, S>(
    mut reader: R,
    mut sink: S,
    state: Arc<watch::Sender<SessionState>>,
    mut upload_done: watch::Receiver<bool>,
    result_timeout: Duration,
) -> (R, S, ReceiveSummary)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
    S: ResultSink,
{
    let mut deadline: Option<Instant> = None;
    let mut messages = 0u64;

    let end = loop {
        tokio::select! {
            _ = upload_done.changed(), if deadline.is_none() => {
                log::debug!(
                    "Upload finished, waiting up to {:?} for results",
                    result_timeout
                );
                deadline = Some(Instant::now() + result_timeout);
            }
            _ = wait_for(deadline) => {
                log::debug!("No further results after {} messages", messages);
                break ReceiveEnd::TimedOut;
            }
            next = reader.next() => {
                let text = match next {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(bytes))) => {
                        String::from_utf8_lossy(&bytes).into_owned()
                    }
                    Some(Ok(Message::Close(frame))) => {
                        log::debug!("Server sent close frame: {:?}", frame);
                        break ReceiveEnd::PeerClosed;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => break ReceiveEnd::TransportFailed(e.to_string()),
                    None => break ReceiveEnd::PeerClosed,
                };

                messages += 1;
                let result = decode(&text);
                if let Err(e) = sink.handle(&result) {
                    log::warn!("Sink '{}' failed to handle result: {}", sink.name(), e);
                }
            }
        }
    };

    if end != ReceiveEnd::TimedOut {
        advance(&state, SessionState::Closing);
    }
    sink.finish(&end);

    (reader, sink, ReceiveSummary { messages, end })
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
