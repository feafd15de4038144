//! Inbound result decoding and delivery.

pub mod decoder;
pub mod sink;

pub use decoder::{
    DecodeError, Segment, Transcript, TranscriptionResult, UnstructuredReason, decode, parse,
};
pub use sink::{CollectorSink, ConsoleSink, ResultSink};
