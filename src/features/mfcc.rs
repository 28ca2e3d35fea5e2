//! Mel-frequency cepstral coefficient extraction
//!
//! Converts a standardized buffer into a `(T × C)` feature matrix.
//!
//! # Algorithm
//!
//! 1. Split into frames of `frame_length` samples every `hop_length` samples,
//!    without centering: `T = floor((N - frame) / hop) + 1`
//! 2. Periodic Hann window, `frame_length`-point FFT, one-sided power spectrum
//! 3. Slaney mel filterbank
//! 4. Log compression `10 * log10(max(E, 1e-10))`, floored at `max - top_db`
//! 5. Orthonormal DCT-II, keeping the first C coefficients
//! 6. Per-coefficient z-score across the T frames of this file
//!
//! The expected shape is checked after extraction; a mismatch is logged and
//! reported, never fatal.
//!
//! # Example
//!
//! ```no_run
//! use kws_dsp::features::mfcc::MfccExtractor;
//! use kws_dsp::{AudioBuffer, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let extractor = MfccExtractor::new(&config)?;
//! let buffer = AudioBuffer::silence(config.target_samples(), config.sample_rate);
//! let extraction = extractor.extract(&buffer)?;
//! assert_eq!(extraction.matrix.shape(), (118, 40));
//! # Ok::<(), kws_dsp::PrepError>(())
//! ```

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::{frame_count, PipelineConfig};
use crate::error::PrepError;
use crate::features::matrix::FeatureMatrix;
use crate::features::mel::MelFilterbank;
use crate::features::normalization::normalize_columns;
use crate::io::sample_buffer::AudioBuffer;

/// Floor applied to mel energies before taking the log
const AMIN: f32 = 1e-10;

/// Output of one extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Normalized `(T × C)` features
    pub matrix: FeatureMatrix,
    /// Whether the shape equals the configured expectation
    pub shape_matches: bool,
    /// Constant columns zeroed by normalization
    pub guarded_columns: usize,
}

/// Reusable MFCC extractor; plans the FFT and builds tables once
pub struct MfccExtractor {
    sample_rate: u32,
    frame_length: usize,
    hop_length: usize,
    n_coefficients: usize,
    top_db: Option<f32>,
    expected_shape: (usize, usize),
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch_len: usize,
    filterbank: MelFilterbank,
    /// Row-major `n_coefficients × n_mels` DCT-II basis
    dct: Vec<f32>,
}

impl std::fmt::Debug for MfccExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfccExtractor")
            .field("sample_rate", &self.sample_rate)
            .field("frame_length", &self.frame_length)
            .field("hop_length", &self.hop_length)
            .field("n_coefficients", &self.n_coefficients)
            .field("n_mels", &self.filterbank.n_mels())
            .finish()
    }
}

/// Periodic Hann window of `len` samples
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / len as f64;
            (0.5 * (1.0 - phase.cos())) as f32
        })
        .collect()
}

/// Orthonormal DCT-II basis, first `n_out` rows of an `n_in`-point transform
fn dct_basis(n_out: usize, n_in: usize) -> Vec<f32> {
    let n = n_in as f64;
    let mut basis = vec![0.0f32; n_out * n_in];
    for k in 0..n_out {
        let scale = if k == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        for m in 0..n_in {
            let angle = std::f64::consts::PI * k as f64 * (2.0 * m as f64 + 1.0) / (2.0 * n);
            basis[k * n_in + m] = (scale * angle.cos()) as f32;
        }
    }
    basis
}

impl MfccExtractor {
    /// Build an extractor for `config`
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidInput` if the configuration is inconsistent.
    pub fn new(config: &PipelineConfig) -> Result<Self, PrepError> {
        config.validate()?;

        let frame_length = config.frame_length();
        let n_mels = config.n_mels;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_length);
        let scratch_len = fft.get_inplace_scratch_len();

        log::debug!(
            "MFCC extractor: frame={} hop={} mels={} coefficients={}",
            frame_length,
            config.hop_length(),
            n_mels,
            config.n_coefficients
        );

        Ok(Self {
            sample_rate: config.sample_rate,
            frame_length,
            hop_length: config.hop_length(),
            n_coefficients: config.n_coefficients,
            top_db: config.top_db,
            expected_shape: config.expected_shape(),
            window: hann_window(frame_length),
            fft,
            scratch_len,
            filterbank: MelFilterbank::new(config.sample_rate, frame_length, n_mels),
            dct: dct_basis(config.n_coefficients, n_mels),
        })
    }

    /// Frame count produced for a buffer of `n_samples`
    pub fn frames_for(&self, n_samples: usize) -> usize {
        frame_count(n_samples, self.frame_length, self.hop_length)
    }

    /// Log-compressed mel energies, `(T × n_mels)` row-major
    fn log_mel(&self, buffer: &AudioBuffer) -> Vec<f32> {
        let n_mels = self.filterbank.n_mels();
        let n_bins = self.filterbank.n_bins();
        let n_frames = self.frames_for(buffer.len());

        let mut spectrum = vec![Complex::new(0.0f32, 0.0); self.frame_length];
        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.scratch_len];
        let mut power = vec![0.0f32; n_bins];
        let mut log_mel = vec![0.0f32; n_frames * n_mels];

        for (t, frame) in buffer
            .frames(self.frame_length, self.hop_length)
            .enumerate()
        {
            for ((slot, &x), &w) in spectrum.iter_mut().zip(frame).zip(&self.window) {
                *slot = Complex::new(x * w, 0.0);
            }
            self.fft.process_with_scratch(&mut spectrum, &mut scratch);

            for (p, c) in power.iter_mut().zip(&spectrum) {
                *p = c.re * c.re + c.im * c.im;
            }

            let row = &mut log_mel[t * n_mels..(t + 1) * n_mels];
            self.filterbank.apply(&power, row);
            for e in row.iter_mut() {
                *e = 10.0 * e.max(AMIN).log10();
            }
        }

        if let Some(top_db) = self.top_db {
            let max_db = log_mel.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let floor = max_db - top_db;
            for e in log_mel.iter_mut() {
                *e = e.max(floor);
            }
        }

        log_mel
    }

    /// Raw cepstral coefficients before normalization
    pub fn cepstrum(&self, buffer: &AudioBuffer) -> Result<FeatureMatrix, PrepError> {
        if buffer.sample_rate() != self.sample_rate {
            return Err(PrepError::InvalidInput(format!(
                "Buffer sample rate {} Hz does not match extractor rate {} Hz",
                buffer.sample_rate(),
                self.sample_rate
            )));
        }

        let n_frames = self.frames_for(buffer.len());
        if n_frames == 0 {
            return Err(PrepError::InvalidInput(format!(
                "Buffer of {} samples is shorter than one {}-sample frame",
                buffer.len(),
                self.frame_length
            )));
        }

        let n_mels = self.filterbank.n_mels();
        let log_mel = self.log_mel(buffer);

        let mut matrix = FeatureMatrix::zeros(n_frames, self.n_coefficients);
        for t in 0..n_frames {
            let bands = &log_mel[t * n_mels..(t + 1) * n_mels];
            let row = matrix.row_mut(t);
            for (k, coeff) in row.iter_mut().enumerate() {
                let basis = &self.dct[k * n_mels..(k + 1) * n_mels];
                *coeff = basis.iter().zip(bands).map(|(&b, &e)| b * e).sum();
            }
        }

        if !matrix.is_finite() {
            return Err(PrepError::NumericalError(
                "Non-finite cepstral coefficient".to_string(),
            ));
        }

        Ok(matrix)
    }

    /// Extract normalized `(T × C)` features from a standardized buffer
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidInput` if the buffer's sample rate differs
    /// from the configuration or the buffer is shorter than one frame, and
    /// `PrepError::NumericalError` if the input contains non-finite samples.
    pub fn extract(&self, buffer: &AudioBuffer) -> Result<Extraction, PrepError> {
        let mut matrix = self.cepstrum(buffer)?;
        let guarded_columns = normalize_columns(&mut matrix);

        let shape_matches = matrix.shape() == self.expected_shape;
        if !shape_matches {
            log::warn!(
                "Feature shape {:?} differs from expected {:?}",
                matrix.shape(),
                self.expected_shape
            );
        }

        Ok(Extraction {
            matrix,
            shape_matches,
            guarded_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentation::random::{RandomSource, SeededRandom};

    fn speechlike(len: usize, sample_rate: u32) -> AudioBuffer {
        let mut rng = SeededRandom::new(21);
        let sr = sample_rate as f32;
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / sr;
                // Gliding tone plus an amplitude envelope and a little noise
                let freq = 300.0 + 1500.0 * t;
                let env = 0.5 + 0.5 * (2.0 * std::f32::consts::PI * 3.0 * t).sin();
                0.4 * env * (2.0 * std::f32::consts::PI * freq * t).sin()
                    + rng.uniform(-0.02, 0.02)
            })
            .collect();
        AudioBuffer::new(samples, sample_rate)
    }

    #[test]
    fn test_default_shape() {
        let config = PipelineConfig::default();
        let extractor = MfccExtractor::new(&config).unwrap();
        let buffer = speechlike(19_200, 16_000);

        let extraction = extractor.extract(&buffer).unwrap();
        assert_eq!(extraction.matrix.shape(), ((19_200 - 400) / 160 + 1, 40));
        assert_eq!(extraction.matrix.shape(), (118, 40));
        assert!(extraction.shape_matches);
    }

    #[test]
    fn test_columns_normalized() {
        let config = PipelineConfig::default();
        let extractor = MfccExtractor::new(&config).unwrap();
        let extraction = extractor.extract(&speechlike(19_200, 16_000)).unwrap();
        let m = &extraction.matrix;

        for c in 0..m.n_coefficients() {
            let (mean, std) = m.column_stats(c);
            assert!(mean.abs() < 1e-4, "coefficient {} mean {}", c, mean);
            if std > 0.0 {
                assert!((std - 1.0).abs() < 1e-3, "coefficient {} std {}", c, std);
            }
        }
        assert!(m.is_finite());
    }

    #[test]
    fn test_silence_is_guarded_not_nan() {
        let config = PipelineConfig::default();
        let extractor = MfccExtractor::new(&config).unwrap();
        let extraction = extractor
            .extract(&AudioBuffer::silence(19_200, 16_000))
            .unwrap();

        assert_eq!(extraction.guarded_columns, 40);
        assert!(extraction.matrix.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let config = PipelineConfig {
            expected_frames: Some(121),
            ..PipelineConfig::default()
        };
        let extractor = MfccExtractor::new(&config).unwrap();
        let extraction = extractor.extract(&speechlike(19_200, 16_000)).unwrap();
        assert_eq!(extraction.matrix.n_frames(), 118);
        assert!(!extraction.shape_matches);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let extractor = MfccExtractor::new(&PipelineConfig::default()).unwrap();
        let result = extractor.extract(&AudioBuffer::silence(399, 16_000));
        assert!(matches!(result, Err(PrepError::InvalidInput(_))));
    }

    #[test]
    fn test_rate_mismatch_rejected() {
        let extractor = MfccExtractor::new(&PipelineConfig::default()).unwrap();
        let result = extractor.extract(&AudioBuffer::silence(19_200, 8_000));
        assert!(result.is_err());
    }

    #[test]
    fn test_dct_basis_orthonormal() {
        let n = 16;
        let basis = dct_basis(n, n);
        for a in 0..n {
            for b in 0..n {
                let dot: f32 = (0..n).map(|m| basis[a * n + m] * basis[b * n + m]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_hann_window_periodic() {
        let w = hann_window(400);
        assert_eq!(w[0], 0.0);
        assert!((w[200] - 1.0).abs() < 1e-6);
        assert!(w[399] > 0.0);
    }

    #[test]
    fn test_louder_tone_raises_c0() {
        let config = PipelineConfig::default();
        let extractor = MfccExtractor::new(&config).unwrap();
        let quiet = AudioBuffer::new(
            (0..19_200)
                .map(|i| 0.05 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 16_000.0).sin())
                .collect(),
            16_000,
        );
        let loud = crate::augmentation::volume::scale(&quiet, 10.0);
        let c_quiet = extractor.cepstrum(&quiet).unwrap();
        let c_loud = extractor.cepstrum(&loud).unwrap();
        // +20 dB in every band shifts c0 by 20 * sqrt(n_mels)
        let delta = c_loud.get(10, 0) - c_quiet.get(10, 0);
        assert!((delta - 20.0 * (64f32).sqrt()).abs() < 0.5, "delta {}", delta);
    }
}
