//! Volume perturbation
//!
//! Scales the whole buffer by one random factor. No clipping is applied here;
//! out-of-range samples are clipped when the variant is encoded to PCM.

use crate::augmentation::random::RandomSource;
use crate::io::sample_buffer::AudioBuffer;

/// Multiply every sample by `factor`
pub fn scale(signal: &AudioBuffer, factor: f32) -> AudioBuffer {
    let samples = signal.samples().iter().map(|&x| x * factor).collect();
    AudioBuffer::new(samples, signal.sample_rate())
}

/// Scale by a factor drawn uniformly from `range`
pub fn apply_volume<R: RandomSource + ?Sized>(
    signal: &AudioBuffer,
    range: (f32, f32),
    rng: &mut R,
) -> AudioBuffer {
    let factor = rng.uniform(range.0, range.1);
    log::debug!("Volume perturbation x{:.3}", factor);
    scale(signal, factor)
}
