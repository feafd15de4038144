//! Streaming application entry point.
//!
//! Orchestrates one run end to end:
//! decode → normalize → chunk/pace → session → sink

use crate::audio::{AudioFormat, SampleBuffer, decode_wav_file, normalize};
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, ScribeError};
use crate::results::ResultSink;
use crate::session::{ConnectionSession, SessionReport};
use crate::streaming::{Chunker, FramePacer, PaceOutcome};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Knobs for one streaming run, resolved from config and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    pub url: String,
    pub connect_timeout: Duration,
    pub frame_samples: usize,
    pub frame_delay: Duration,
    pub result_timeout: Duration,
}

impl StreamOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.server.url.clone(),
            connect_timeout: config.server.connect_timeout(),
            frame_samples: config.stream.frame_samples,
            frame_delay: config.stream.frame_delay(),
            result_timeout: config.stream.result_timeout(),
        }
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A decoded file, normalized and ready to stream.
#[derive(Debug, Clone)]
pub struct PreparedAudio {
    /// Format of the source file before normalization.
    pub format: AudioFormat,
    pub buffer: SampleBuffer,
}

/// Everything that happened during [`stream_file`] / [`stream_buffer`].
#[derive(Debug)]
pub struct RunReport {
    /// Samples streamed (after normalization).
    pub samples: usize,
    pub frames: usize,
    pub pace: PaceOutcome,
    pub session: SessionReport,
}

/// Summary printed by `streamscribe inspect`.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub format: AudioFormat,
    pub source_frames: usize,
    pub duration_secs: f64,
    pub normalized_samples: usize,
    pub frames: usize,
}

/// Decode and normalize a WAV file to the target rate.
///
/// Runs before any connection is attempted, so a bad file never opens a
/// socket.
pub fn prepare_file(path: &Path) -> Result<PreparedAudio> {
    let decoded = decode_wav_file(path)?;
    let format = decoded.format;
    log::info!(
        "Loaded {}: {} Hz, {} channel(s), {}-bit, {:.2}s",
        path.display(),
        format.sample_rate,
        format.channel_count,
        format.bits_per_sample,
        decoded.duration_secs()
    );

    let buffer = normalize(decoded, defaults::TARGET_SAMPLE_RATE)?;
    Ok(PreparedAudio { format, buffer })
}

/// Stream an already-normalized buffer and deliver results to `sink`.
///
/// Connection failures are returned as errors. Upload failures are carried
/// in the report so results received before the failure are not lost.
pub async fn stream_buffer<S: ResultSink>(
    buffer: SampleBuffer,
    options: &StreamOptions,
    sink: S,
) -> Result<(RunReport, S)> {
    let chunker = Chunker::new(options.frame_samples)?;
    let samples = buffer.len();
    let frames = chunker.frame_count(samples);

    let session = ConnectionSession::connect(&options.url, options.connect_timeout).await?;
    log::info!(
        "Streaming {} samples as {} frame(s) of up to {} samples",
        samples,
        frames,
        chunker.frame_samples()
    );

    let (tx, rx) = mpsc::channel(defaults::OUTBOUND_CHANNEL_CAPACITY);
    let pacer = FramePacer::new(options.frame_delay);
    let producer = tokio::spawn(async move { pacer.run(chunker.split(buffer), tx).await });

    let (session, sink) = session.run(rx, sink, options.result_timeout).await?;
    let pace = producer
        .await
        .map_err(|e| ScribeError::Other(format!("Pacer task failed: {}", e)))?;

    Ok((
        RunReport {
            samples,
            frames,
            pace,
            session,
        },
        sink,
    ))
}

/// Decode, normalize and stream a WAV file.
pub async fn stream_file<S: ResultSink>(
    path: &Path,
    options: &StreamOptions,
    sink: S,
) -> Result<(RunReport, S)> {
    let prepared = prepare_file(path)?;
    stream_buffer(prepared.buffer, options, sink).await
}

/// Decode and normalize without connecting.
pub fn inspect_file(path: &Path, frame_samples: usize) -> Result<InspectReport> {
    let chunker = Chunker::new(frame_samples)?;
    let decoded = decode_wav_file(path)?;
    let format = decoded.format;
    let source_frames = decoded.frame_count();
    let duration_secs = decoded.duration_secs();

    let buffer = normalize(decoded, defaults::TARGET_SAMPLE_RATE)?;
    Ok(InspectReport {
        format,
        source_frames,
        duration_secs,
        normalized_samples: buffer.len(),
        frames: chunker.frame_count(buffer.len()),
    })
}
