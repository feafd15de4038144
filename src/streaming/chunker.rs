//! Splits a normalized sample buffer into fixed-size frames.
//!
//! Frames keep production order; the last frame may be short. Nothing is
//! padded, truncated or dropped.

use crate::audio::SampleBuffer;
use crate::defaults;
use crate::error::{Result, ScribeError};
use crate::streaming::frame::Frame;

/// Fixed-size frame splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    frame_samples: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            frame_samples: defaults::FRAME_SAMPLES,
        }
    }
}

impl Chunker {
    /// Creates a chunker emitting frames of `frame_samples` samples.
    pub fn new(frame_samples: usize) -> Result<Self> {
        if frame_samples == 0 {
            return Err(ScribeError::InvalidConfig {
                key: "stream.frame_samples".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(Self { frame_samples })
    }

    pub fn frame_samples(&self) -> usize {
        self.frame_samples
    }

    /// Number of frames `split` yields for a buffer of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        len.div_ceil(self.frame_samples)
    }

    /// Consume the buffer and yield its frames in order, numbered from 0.
    pub fn split(&self, buffer: SampleBuffer) -> impl Iterator<Item = Frame> + Send + 'static {
        let frame_samples = self.frame_samples;
        let samples = buffer.into_samples();
        let mut start = 0usize;
        let mut sequence = 0u64;

        std::iter::from_fn(move || {
            if start >= samples.len() {
                return None;
            }
            let end = (start + frame_samples).min(samples.len());
            let frame = Frame::new(sequence, samples[start..end].to_vec());
            start = end;
            sequence += 1;
            Some(frame)
        })
    }
}
