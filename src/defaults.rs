//! Default configuration constants for streamscribe.
//!
//! Shared between the config layer, the CLI and the library core so that the
//! wire contract with the transcription server is spelled out in one place.

/// Sample rate the transcription server expects, in Hz.
///
/// Every buffer leaving the normalizer is mono at this rate.
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Samples per transmitted frame: one second at the target rate.
pub const FRAME_SAMPLES: usize = 16000;

/// Delay after each frame to emulate live capture cadence.
pub const FRAME_DELAY_MS: u64 = 100;

/// How long to keep receiving results once the upload has finished.
pub const RESULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound for the WebSocket handshake.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default server endpoint.
pub const SERVER_URL: &str = "ws://127.0.0.1:9000";

/// Text control message that ends an utterance.
pub const FLUSH_COMMAND: &str = "flush";

/// Capacity of the pacer → upload channel.
/// The pacer can run at most this many messages ahead of the socket.
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 4;
