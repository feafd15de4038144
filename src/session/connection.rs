//! Connection setup and the lifetime of one session.
//!
//! `connect` performs the handshake; `run` drives the upload and receive
//! flows on separate tasks and closes the socket once both are done.

use super::receive::receive_flow;
use super::upload::upload_flow;
use super::{SessionReport, SessionState, advance};
use crate::error::{Result, ScribeError};
use crate::results::ResultSink;
use crate::streaming::Outbound;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `wss://` handshakes need a process-wide rustls provider; ring is the only
/// one compiled in.
fn install_tls_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        log::trace!("TLS crypto provider already installed");
    }
}

/// Wait for both flows. If the upload task dies the receive task is aborted
/// so it does not outlive the session holding the read half.
async fn join_flows<U, R>(upload: JoinHandle<U>, receive: JoinHandle<R>) -> Result<(U, R)>
where
    U: Send + 'static,
    R: Send + 'static,
{
    let uploaded = match upload.await {
        Ok(output) => output,
        Err(e) => {
            receive.abort();
            return Err(ScribeError::Other(format!("Upload task failed: {}", e)));
        }
    };
    let received = receive
        .await
        .map_err(|e| ScribeError::Other(format!("Receive task failed: {}", e)))?;

    Ok((uploaded, received))
}

/// One WebSocket connection to the transcription server.
///
/// Created by [`ConnectionSession::connect`] and consumed by
/// [`ConnectionSession::run`]; a session is never reused.
pub struct ConnectionSession {
    stream: WsStream,
    url: String,
    state: Arc<watch::Sender<SessionState>>,
}

impl ConnectionSession {
    /// Open the connection. Fails without retrying on refusal, handshake
    /// error or when `connect_timeout` elapses.
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self> {
        let (state, _) = watch::channel(SessionState::Connecting);
        log::info!("Connecting to {}", url);
        if url.starts_with("wss://") {
            install_tls_provider();
        }

        let connection_error = |message: String| ScribeError::Connection {
            url: url.to_string(),
            message,
        };

        let (stream, response) = tokio::time::timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| connection_error(format!("timed out after {:?}", connect_timeout)))?
            .map_err(|e| connection_error(e.to_string()))?;

        log::debug!("Handshake complete (HTTP {})", response.status());
        advance(&state, SessionState::Open);

        Ok(Self {
            stream,
            url: url.to_string(),
            state: Arc::new(state),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Observe the lifecycle state.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Run the upload and receive flows to completion, then close the socket.
    ///
    /// Returns the report together with the sink so callers can inspect what
    /// it collected.
    pub async fn run<S: ResultSink>(
        self,
        outbound: mpsc::Receiver<Outbound>,
        sink: S,
        result_timeout: Duration,
    ) -> Result<(SessionReport, S)> {
        let Self { stream, url, state } = self;
        let (writer, reader) = stream.split();
        let (done_tx, done_rx) = watch::channel(false);

        let upload = tokio::spawn(upload_flow(writer, outbound, state.subscribe(), done_tx));
        let receive = tokio::spawn(receive_flow(
            reader,
            sink,
            state.clone(),
            done_rx,
            result_timeout,
        ));

        let ((writer, upload_summary, upload_error), (reader, sink, receive_summary)) =
            join_flows(upload, receive).await?;

        advance(&state, SessionState::Closing);
        match reader.reunite(writer) {
            Ok(mut stream) => {
                if let Err(e) = stream.close(None).await {
                    log::debug!("Close handshake with {} failed: {}", url, e);
                }
            }
            Err(e) => log::warn!("Could not reunite socket halves: {}", e),
        }
        advance(&state, SessionState::Closed);

        log::info!(
            "Session with {} finished: {} frames sent, {} results, {:?}",
            url,
            upload_summary.frames_sent,
            receive_summary.messages,
            receive_summary.end
        );

        let report = SessionReport {
            upload: upload_summary,
            upload_error,
            receive: receive_summary,
            final_state: *state.borrow(),
        };
        Ok((report, sink))
    }
}
