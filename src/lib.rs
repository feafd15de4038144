//! streamscribe - Stream recorded audio to a transcription server
//!
//! Decodes a WAV file, normalizes it to 16 kHz mono, and streams it over a
//! WebSocket while printing the transcription results the server sends back.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod output;
pub mod results;
pub mod session;
pub mod streaming;

// Source → frames
pub use audio::{AudioFormat, DecodedAudio, SampleBuffer, decode_wav, decode_wav_file, normalize};
pub use streaming::{Chunker, Frame, FramePacer, Outbound};

// Session and results
pub use results::{CollectorSink, ConsoleSink, ResultSink, TranscriptionResult};
pub use session::{ConnectionSession, ReceiveEnd, SessionReport, SessionState};

// Error handling
pub use error::{Result, ScribeError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
