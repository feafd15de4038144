//! Wire encoding of outbound messages.
//!
//! - Frame: one binary message of little-endian `f32` samples, no header.
//! - Flush: the text message `flush`.

use crate::defaults::FLUSH_COMMAND;
use crate::streaming::{Frame, Outbound};
use tokio_tungstenite::tungstenite::Message;

pub fn frame_message(frame: &Frame) -> Message {
    Message::Binary(frame.to_le_bytes())
}

pub fn flush_message() -> Message {
    Message::Text(FLUSH_COMMAND.to_string())
}

pub fn outbound_message(item: &Outbound) -> Message {
    match item {
        Outbound::Frame(frame) => frame_message(frame),
        Outbound::Flush => flush_message(),
    }
}

/// Decode a binary frame message back into samples. Trailing bytes that do
/// not form a whole sample are ignored.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
