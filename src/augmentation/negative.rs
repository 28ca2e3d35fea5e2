//! Negative sample generation
//!
//! Negatives for keyword spotting come from two places:
//! - Pure background: the noise library cut into consecutive clip-length slices
//! - Non-keyword speech (confusable words, everyday talk) mixed with background
//!   noise at SNRs drawn from a discrete set

use crate::augmentation::noise::{mix_noise_tagged, NoiseLibrary, NoisyBuffer};
use crate::augmentation::random::RandomSource;
use crate::config::SnrDistribution;
use crate::io::sample_buffer::AudioBuffer;

/// Cut the library into non-overlapping slices of exactly `segment_len` samples
///
/// The trailing remainder shorter than `segment_len` is discarded.
pub fn slice_noise(library: &NoiseLibrary, segment_len: usize) -> Vec<AudioBuffer> {
    if segment_len == 0 {
        return Vec::new();
    }
    let slices: Vec<AudioBuffer> = library
        .samples()
        .chunks_exact(segment_len)
        .map(|chunk| AudioBuffer::new(chunk.to_vec(), library.sample_rate()))
        .collect();
    log::debug!(
        "Sliced {} noise samples into {} segments of {}",
        library.len(),
        slices.len(),
        segment_len
    );
    slices
}

/// Produce `count` noise-mixed copies of one standardized speech source,
/// each tagged with the SNR it was mixed at
pub fn mix_negative<R: RandomSource + ?Sized>(
    source: &AudioBuffer,
    library: &NoiseLibrary,
    snr: &SnrDistribution,
    count: usize,
    rng: &mut R,
) -> Vec<NoisyBuffer> {
    (0..count)
        .map(|_| mix_noise_tagged(source, library, snr, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentation::random::SeededRandom;

    #[test]
    fn test_slice_noise_drops_remainder() {
        let samples: Vec<f32> = (0..35).map(|i| i as f32 / 100.0).collect();
        let library = NoiseLibrary::new(AudioBuffer::new(samples, 16_000)).unwrap();
        let slices = slice_noise(&library, 10);
        assert_eq!(slices.len(), 3);
        assert!(slices.iter().all(|s| s.len() == 10));
        assert_eq!(slices[2].samples()[0], 0.2);
        assert!(slice_noise(&library, 0).is_empty());
    }

    #[test]
    fn test_mix_negative_count_and_length() {
        let mut rng = SeededRandom::new(11);
        let noise: Vec<f32> = (0..5000).map(|_| rng.uniform(-0.2, 0.2)).collect();
        let library = NoiseLibrary::new(AudioBuffer::new(noise, 16_000)).unwrap();
        let source = AudioBuffer::new(vec![0.25; 16_000], 16_000);
        let snr = SnrDistribution::Choice(vec![-5.0, 0.0, 5.0, 10.0, 15.0]);

        let variants = mix_negative(&source, &library, &snr, 5, &mut rng);
        assert_eq!(variants.len(), 5);
        for v in &variants {
            assert_eq!(v.buffer.len(), 16_000);
            assert_ne!(v.buffer.samples(), source.samples());
            assert!([-5.0, 0.0, 5.0, 10.0, 15.0].contains(&v.snr_db));
        }
    }
}
