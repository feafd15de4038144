//! Conversion of raw interleaved integer samples into the mono unit-range
//! float signal the transcription server expects.

use crate::audio::resample::resample;
use crate::audio::wav::{AudioFormat, DecodedAudio};
use crate::error::Result;

/// Mono `f32` samples in `[-1.0, 1.0]` at a known sample rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Returns the duration of this buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Average all channels of each sample frame and scale to `[-1.0, 1.0]`.
///
/// Scaling divides by 2^(bits-1). A trailing partial frame is dropped.
pub fn mixdown(samples: &[i32], format: &AudioFormat) -> Vec<f32> {
    let channels = format.channel_count as usize;
    let divisor = channels as f64 * format.full_scale() as f64;

    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: f64 = frame.iter().map(|&s| s as f64).sum();
            (sum / divisor) as f32
        })
        .collect()
}

/// Normalize decoded audio: scale, mix down to mono, then resample to
/// `target_rate`.
///
/// Produces `round(frames * target_rate / source_rate)` samples. No
/// resampling happens when the source is already at `target_rate`.
pub fn normalize(audio: DecodedAudio, target_rate: u32) -> Result<SampleBuffer> {
    let format = AudioFormat::new(
        audio.format.sample_rate,
        audio.format.channel_count,
        audio.format.bits_per_sample,
    )?;

    let mono = mixdown(&audio.samples, &format);

    let samples = if format.sample_rate == target_rate {
        mono
    } else {
        log::info!(
            "Resampling {} samples from {} Hz to {} Hz",
            mono.len(),
            format.sample_rate,
            target_rate
        );
        resample(&mono, format.sample_rate, target_rate)
            .into_iter()
            .map(|s| s.clamp(-1.0, 1.0))
            .collect()
    };

    Ok(SampleBuffer::new(samples, target_rate))
}
