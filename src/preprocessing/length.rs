//! Fixed-length standardization
//!
//! Every capture is brought to exactly `target_length` samples before it is
//! augmented or analyzed: short captures are right-padded with exact zeros,
//! long captures keep their first `target_length` samples.
//!
//! # Example
//!
//! ```
//! use kws_dsp::preprocessing::length::standardize;
//! use kws_dsp::AudioBuffer;
//!
//! let short = AudioBuffer::new(vec![0.5; 100], 16000);
//! let fixed = standardize(short, 19200);
//! assert_eq!(fixed.len(), 19200);
//! assert_eq!(fixed.samples()[19199], 0.0);
//! ```

use crate::io::sample_buffer::AudioBuffer;

/// Pad with zeros or truncate `buffer` to exactly `target_length` samples
pub fn standardize(buffer: AudioBuffer, target_length: usize) -> AudioBuffer {
    let original_len = buffer.len();
    if original_len == target_length {
        return buffer;
    }

    let sample_rate = buffer.sample_rate();
    let mut samples = buffer.into_samples();
    if original_len < target_length {
        log::debug!(
            "Padding {} samples with {} zeros",
            original_len,
            target_length - original_len
        );
    } else {
        log::debug!(
            "Truncating {} samples to {}",
            original_len,
            target_length
        );
    }
    samples.resize(target_length, 0.0);

    AudioBuffer::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> AudioBuffer {
        AudioBuffer::new((0..len).map(|i| (i as f32 + 1.0) / 100_000.0).collect(), 16_000)
    }

    #[test]
    fn test_pad_short_buffer() {
        let out = standardize(ramp(10), 16);
        assert_eq!(out.len(), 16);
        assert_eq!(&out.samples()[..10], ramp(10).samples());
        assert!(out.samples()[10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_truncate_keeps_front() {
        let source = ramp(30_000);
        let out = standardize(source.clone(), 19_200);
        assert_eq!(out.len(), 19_200);
        assert_eq!(out.samples(), &source.samples()[..19_200]);
    }

    #[test]
    fn test_equal_length_unchanged() {
        let source = ramp(19_200);
        assert_eq!(standardize(source.clone(), 19_200), source);
    }

    #[test]
    fn test_any_length_hits_target() {
        for len in [0, 1, 399, 19_199, 19_200, 19_201, 48_000] {
            assert_eq!(standardize(ramp(len), 19_200).len(), 19_200);
        }
    }
}
