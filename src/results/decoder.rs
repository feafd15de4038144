//! Decoding of inbound server messages into typed results.
//!
//! The server speaks loosely-shaped JSON. Recognized shapes become
//! [`TranscriptionResult::Error`] or [`TranscriptionResult::Transcript`];
//! everything else is kept verbatim as [`TranscriptionResult::Unstructured`]
//! so one odd message never ends the receive flow.

use serde::Deserialize;
use thiserror::Error;

/// A time-bounded span of transcribed text, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A successful transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Audio duration reported by the server, if any.
    pub duration: Option<f64>,
    /// Segments in the order the server sent them.
    pub segments: Vec<Segment>,
    /// Free-form note, e.g. "No speech detected".
    pub message: Option<String>,
}

/// Why a message could not be decoded into a known shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnstructuredReason {
    /// The payload is not JSON at all.
    InvalidJson,
    /// JSON, but without a string `error` or `transcription` key.
    UnrecognizedShape,
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionResult {
    Error { message: String },
    Transcript(Transcript),
    Unstructured {
        raw: String,
        reason: UnstructuredReason,
    },
}

impl TranscriptionResult {
    pub fn is_error(&self) -> bool {
        matches!(self, TranscriptionResult::Error { .. })
    }

    pub fn as_transcript(&self) -> Option<&Transcript> {
        match self {
            TranscriptionResult::Transcript(t) => Some(t),
            _ => None,
        }
    }
}

/// Per-message decode failure. Never fatal; see [`decode`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unrecognized result shape")]
    UnrecognizedShape,
}

impl DecodeError {
    pub fn reason(&self) -> UnstructuredReason {
        match self {
            DecodeError::InvalidJson(_) => UnstructuredReason::InvalidJson,
            DecodeError::UnrecognizedShape => UnstructuredReason::UnrecognizedShape,
        }
    }
}

/// Wire schema. Variant order sets precedence: `error` wins over
/// `transcription` when both are present.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResult {
    Error {
        error: String,
    },
    Transcript {
        transcription: String,
        duration: Option<f64>,
        segments: Option<Vec<Segment>>,
        message: Option<String>,
    },
}

/// Strictly decode a message.
pub fn parse(text: &str) -> Result<TranscriptionResult, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let wire = WireResult::deserialize(value).map_err(|_| DecodeError::UnrecognizedShape)?;

    Ok(match wire {
        WireResult::Error { error } => TranscriptionResult::Error { message: error },
        WireResult::Transcript {
            transcription,
            duration,
            segments,
            message,
        } => TranscriptionResult::Transcript(Transcript {
            text: transcription,
            duration,
            segments: segments.unwrap_or_default(),
            message,
        }),
    })
}

/// Decode a message, downgrading anything unrecognized to `Unstructured`.
pub fn decode(text: &str) -> TranscriptionResult {
    match parse(text) {
        Ok(result) => result,
        Err(e) => {
            log::debug!("Passing through undecodable message: {}", e);
            TranscriptionResult::Unstructured {
                raw: text.to_string(),
                reason: e.reason(),
            }
        }
    }
}
