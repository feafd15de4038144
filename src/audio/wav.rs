//! WAV container decoding.

use crate::error::{Result, ScribeError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Format metadata of a decoded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Validate and build a format. Only 16- and 32-bit integer PCM is accepted.
    pub fn new(sample_rate: u32, channel_count: u16, bits_per_sample: u16) -> Result<Self> {
        if bits_per_sample != 16 && bits_per_sample != 32 {
            return Err(ScribeError::UnsupportedFormat {
                bits_per_sample,
                encoding: "integer".to_string(),
            });
        }
        if sample_rate == 0 {
            return Err(ScribeError::AudioRead {
                message: "Invalid WAV header: sample rate is zero".to_string(),
            });
        }
        if channel_count == 0 {
            return Err(ScribeError::AudioRead {
                message: "Invalid WAV header: channel count is zero".to_string(),
            });
        }

        Ok(Self {
            sample_rate,
            channel_count,
            bits_per_sample,
        })
    }

    /// Magnitude of the most negative sample, 2^(bits-1).
    pub fn full_scale(&self) -> f32 {
        (1u64 << (self.bits_per_sample - 1)) as f32
    }
}

/// Raw interleaved samples plus the format they were stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub format: AudioFormat,
    pub samples: Vec<i32>,
}

impl DecodedAudio {
    /// Number of complete sample frames (one sample per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.format.channel_count as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.format.sample_rate as f64
    }
}

/// Decode a WAV container from any reader, reading it to completion once.
pub fn decode_wav<R: Read>(reader: R) -> Result<DecodedAudio> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| ScribeError::AudioRead {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let spec = wav_reader.spec();
    if spec.sample_format != hound::SampleFormat::Int {
        return Err(ScribeError::UnsupportedFormat {
            bits_per_sample: spec.bits_per_sample,
            encoding: "float".to_string(),
        });
    }
    let format = AudioFormat::new(spec.sample_rate, spec.channels, spec.bits_per_sample)?;

    let samples: Vec<i32> = wav_reader
        .samples::<i32>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ScribeError::AudioRead {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    log::debug!(
        "Decoded WAV: {} Hz, {} channel(s), {}-bit, {} samples",
        format.sample_rate,
        format.channel_count,
        format.bits_per_sample,
        samples.len()
    );

    Ok(DecodedAudio { format, samples })
}

/// Open and decode a WAV file.
pub fn decode_wav_file(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path)?;
    decode_wav(BufReader::new(file))
}
