//! Raw PCM 16-bit codec
//!
//! The raw container is a headerless sequence of little-endian signed 16-bit
//! samples. The sample rate is not stored; it comes from configuration.
//!
//! Decoding divides by 32768 so every value lands in [-1.0, 1.0). Encoding
//! clips to [-1.0, 1.0], scales by 32767 and rounds to nearest. The round trip
//! is not bit-exact: the error is one quantization step for |x| <= 0.5 and
//! grows by the 32767/32768 scale mismatch to at most 1.5 steps at full scale.
//!
//! # Example
//!
//! ```
//! use kws_dsp::io::pcm::{decode, encode};
//! use kws_dsp::AudioBuffer;
//!
//! let buffer = AudioBuffer::new(vec![0.0, 0.5, -0.25], 16000);
//! let bytes = encode(&buffer);
//! let back = decode(&bytes, 16000)?;
//! assert_eq!(back.len(), 3);
//! # Ok::<(), kws_dsp::PrepError>(())
//! ```

use std::path::Path;

use crate::error::PrepError;
use crate::io::sample_buffer::AudioBuffer;

/// Divisor used when decoding
const DECODE_SCALE: f32 = 32768.0;

/// Multiplier used when encoding
const ENCODE_SCALE: f32 = 32767.0;

/// Bytes per sample in the raw container
pub const BYTES_PER_SAMPLE: usize = 2;

/// Decode raw little-endian i16 bytes into a normalized buffer
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if `bytes` is empty. A trailing odd byte
/// is ignored with a warning, matching how the capture devices occasionally
/// cut a transfer short.
pub fn decode(bytes: &[u8], sample_rate: u32) -> Result<AudioBuffer, PrepError> {
    if bytes.len() < BYTES_PER_SAMPLE {
        return Err(PrepError::DecodingError(format!(
            "PCM container holds {} bytes, need at least one sample",
            bytes.len()
        )));
    }

    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        log::warn!(
            "PCM container has odd length {}, dropping trailing byte",
            bytes.len()
        );
    }

    let samples: Vec<f32> = bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / DECODE_SCALE)
        .collect();

    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Encode a buffer as raw little-endian i16 bytes, clipping to [-1.0, 1.0]
pub fn encode(buffer: &AudioBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(buffer.len() * BYTES_PER_SAMPLE);
    for &sample in buffer.samples() {
        bytes.extend_from_slice(&quantize(sample).to_le_bytes());
    }
    bytes
}

/// Clip and scale one sample to i16. NaN maps to zero.
fn quantize(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let clipped = sample.clamp(-1.0, 1.0);
    (clipped * ENCODE_SCALE).round() as i16
}

/// Read and decode a raw PCM file
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if the file is missing, unreadable, or empty.
pub fn read_pcm_file(path: &Path, sample_rate: u32) -> Result<AudioBuffer, PrepError> {
    let bytes = std::fs::read(path).map_err(|e| {
        PrepError::DecodingError(format!("cannot read {}: {}", path.display(), e))
    })?;
    decode(&bytes, sample_rate)
        .map_err(|e| PrepError::DecodingError(format!("{}: {}", path.display(), e)))
}

/// Encode and write a buffer as a raw PCM file
pub fn write_pcm_file(path: &Path, buffer: &AudioBuffer) -> Result<(), PrepError> {
    std::fs::write(path, encode(buffer))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        let bytes = [0x00, 0x80, 0x00, 0x00, 0xff, 0x7f];
        let buffer = decode(&bytes, 16_000).unwrap();
        assert_eq!(buffer.samples(), &[-1.0, 0.0, 32767.0 / 32768.0]);
    }

    #[test]
    fn test_decode_empty_is_error() {
        assert!(matches!(
            decode(&[], 16_000),
            Err(PrepError::DecodingError(_))
        ));
        assert!(decode(&[0x01], 16_000).is_err());
    }

    #[test]
    fn test_decode_drops_odd_byte() {
        let buffer = decode(&[0x00, 0x40, 0x12], 16_000).unwrap();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.samples()[0], 0.5);
    }

    #[test]
    fn test_encode_clips_out_of_range() {
        let buffer = AudioBuffer::new(vec![1.7, -3.0, f32::NAN], 16_000);
        let bytes = encode(&buffer);
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(values, vec![32767, -32767, 0]);
    }

    #[test]
    fn test_round_trip_within_one_step() {
        let samples: Vec<f32> = (0..1001).map(|i| -0.5 + i as f32 / 1000.0).collect();
        let buffer = AudioBuffer::new(samples.clone(), 16_000);
        let back = decode(&encode(&buffer), 16_000).unwrap();

        let step = 1.0 / 32768.0;
        for (a, b) in samples.iter().zip(back.samples()) {
            assert!(
                (a - b).abs() <= step + 1e-7,
                "round trip drifted: {} -> {}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_round_trip_full_scale_bound() {
        let samples: Vec<f32> = (0..2001).map(|i| -1.0 + i as f32 / 1000.0).collect();
        let buffer = AudioBuffer::new(samples.clone(), 16_000);
        let back = decode(&encode(&buffer), 16_000).unwrap();

        let bound = 1.5 / 32768.0 + 1e-7;
        for (a, b) in samples.iter().zip(back.samples()) {
            assert!((a - b).abs() <= bound, "round trip drifted: {} -> {}", a, b);
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_pcm_file(Path::new("/nonexistent/capture.bin"), 16_000);
        assert!(matches!(result, Err(PrepError::DecodingError(_))));
    }
}
