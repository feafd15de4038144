//! Audio ingestion: container decoding, normalization and resampling.
//!
//! ```text
//! WAV bytes ──▶ decode_wav ──▶ DecodedAudio (interleaved i32 + AudioFormat)
//!                                   │
//!                                   ▼
//!                 normalize: scale → mixdown → resample
//!                                   │
//!                                   ▼
//!                     SampleBuffer (mono f32 @ 16 kHz)
//! ```

pub mod normalize;
pub mod resample;
pub mod wav;

pub use normalize::{SampleBuffer, normalize};
pub use resample::{resample, resampled_len};
pub use wav::{AudioFormat, DecodedAudio, decode_wav, decode_wav_file};
