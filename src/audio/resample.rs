//! Band-limited sample-rate conversion in the frequency domain.
//!
//! The whole signal is transformed once, its spectrum is truncated or
//! zero-padded to the target length and transformed back. This is exact for
//! periodic signals and deterministic for a given input.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Output length for a rate conversion: `round(len * to_rate / from_rate)`,
/// halves rounded up. Integer arithmetic, so no float drift on long inputs.
pub fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == 0 {
        return 0;
    }
    let num = len as u128 * to_rate as u128;
    let den = from_rate as u128;
    ((2 * num + den) / (2 * den)) as usize
}

/// Resample a mono signal from `from_rate` to `to_rate`.
///
/// Returns exactly [`resampled_len`] samples. When that length equals the
/// input length (always the case for equal rates) the input is returned
/// unchanged.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let input_len = samples.len();
    let output_len = resampled_len(input_len, from_rate, to_rate);

    if output_len == input_len {
        return samples.to_vec();
    }
    if input_len == 0 || output_len == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    planner.plan_fft_forward(input_len).process(&mut spectrum);

    let mut resized = vec![Complex::new(0.0, 0.0); output_len];
    let shared = input_len.min(output_len);

    // DC and positive frequencies, up to and including the shared Nyquist bin.
    let positive = shared / 2 + 1;
    resized[..positive].copy_from_slice(&spectrum[..positive]);

    // Negative frequencies, excluding -N/2 for even lengths.
    let negative = shared - positive;
    if negative > 0 {
        resized[output_len - negative..].copy_from_slice(&spectrum[input_len - negative..]);
    }

    if shared % 2 == 0 {
        let half = shared / 2;
        if output_len < input_len {
            // Fold the -N/2 component onto +N/2.
            resized[half] += spectrum[input_len - half];
        } else {
            // Split the Nyquist component evenly between +N/2 and -N/2.
            resized[half] *= 0.5;
            resized[output_len - half] = resized[half];
        }
    }

    planner.plan_fft_inverse(output_len).process(&mut resized);

    // rustfft does not normalize; 1/N of the input length restores amplitude.
    let scale = 1.0 / input_len as f64;
    resized.iter().map(|c| (c.re * scale) as f32).collect()
}
