//! Time shift with edge zeroing
//!
//! The buffer is rotated by a whole number of samples and the content that
//! wrapped around is replaced by zeros. A shift of `+k` delays the signal by
//! `k` samples with silence in front; `-k` advances it with silence at the end.

use crate::augmentation::random::RandomSource;
use crate::io::sample_buffer::AudioBuffer;

/// Draw a sample offset from a range in seconds, truncated toward zero
pub fn draw_shift_samples<R: RandomSource + ?Sized>(
    sample_rate: u32,
    range_secs: (f32, f32),
    rng: &mut R,
) -> i64 {
    let secs = rng.uniform(range_secs.0, range_secs.1);
    (sample_rate as f64 * secs as f64) as i64
}

/// Shift `samples` by `offset`, discarding wrapped content
pub fn shift_with_zero_fill(samples: &[f32], offset: i64) -> Vec<f32> {
    let n = samples.len();
    let k = (offset.unsigned_abs() as usize).min(n);
    let mut out = vec![0.0f32; n];
    if offset >= 0 {
        out[k..].copy_from_slice(&samples[..n - k]);
    } else {
        out[..n - k].copy_from_slice(&samples[k..]);
    }
    out
}

/// Shift by a random offset drawn from `range_secs`
pub fn apply_time_shift<R: RandomSource + ?Sized>(
    signal: &AudioBuffer,
    range_secs: (f32, f32),
    rng: &mut R,
) -> AudioBuffer {
    let offset = draw_shift_samples(signal.sample_rate(), range_secs, rng);
    log::debug!("Time shift by {} samples", offset);
    AudioBuffer::new(
        shift_with_zero_fill(signal.samples(), offset),
        signal.sample_rate(),
    )
}
