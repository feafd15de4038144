//! WebSocket session with the transcription server.
//!
//! ```text
//!                      ┌────────────── ConnectionSession ──────────────┐
//!  mpsc<Outbound> ───▶ │ upload flow  ──▶ write half ──▶               │
//!                      │                                    server     │
//!  ResultSink    ◀──── │ receive flow ◀── read half  ◀──               │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! Each flow owns one half of the socket. They share only a
//! `watch<SessionState>` and an "upload finished" flag; the halves are
//! reunited and closed after both flows have returned.

mod connection;
pub mod protocol;
mod receive;
mod upload;

pub use connection::ConnectionSession;

use crate::error::ScribeError;
use tokio::sync::watch;

/// Lifecycle of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Move `state` forward to `next`; backwards moves are ignored.
pub(crate) fn advance(state: &watch::Sender<SessionState>, next: SessionState) {
    state.send_if_modified(|current| {
        if next > *current {
            log::debug!("Session state {:?} -> {:?}", current, next);
            *current = next;
            true
        } else {
            false
        }
    });
}

/// Why the receive flow stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveEnd {
    /// No further results within the wait window after upload completion.
    TimedOut,
    /// The server sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the socket failed.
    TransportFailed(String),
}

/// What the upload flow managed to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadSummary {
    pub frames_sent: u64,
    pub samples_sent: u64,
    pub flushed: bool,
}

/// What the receive flow saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveSummary {
    /// Text and binary messages decoded and handed to the sink.
    pub messages: u64,
    pub end: ReceiveEnd,
}

/// Outcome of [`ConnectionSession::run`].
#[derive(Debug)]
pub struct SessionReport {
    pub upload: UploadSummary,
    /// Set when the upload flow stopped on a transport failure.
    pub upload_error: Option<ScribeError>,
    pub receive: ReceiveSummary,
    pub final_state: SessionState,
}

impl SessionReport {
    /// True when every frame and the flush marker went out.
    pub fn upload_complete(&self) -> bool {
        self.upload_error.is_none() && self.upload.flushed
    }
}
