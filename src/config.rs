//! Configuration parameters for augmentation and feature extraction
//!
//! Every constant the pipeline depends on lives in [`PipelineConfig`], which is
//! built once and passed by reference into each component. Derived sizes
//! (target sample count, frame length, hop, expected frame count) are computed
//! from the stored parameters rather than kept as separate constants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// How a target SNR is chosen for each noise-mixed variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnrDistribution {
    /// Uniform draw from `[min_db, max_db]`
    Uniform {
        /// Lower bound in dB
        min_db: f32,
        /// Upper bound in dB
        max_db: f32,
    },
    /// Uniform pick from a discrete set of dB values
    Choice(Vec<f32>),
}

impl SnrDistribution {
    fn validate(&self) -> Result<(), PrepError> {
        match self {
            SnrDistribution::Uniform { min_db, max_db } => {
                if !min_db.is_finite() || !max_db.is_finite() || min_db > max_db {
                    return Err(PrepError::InvalidInput(format!(
                        "Invalid SNR range: min={}, max={}",
                        min_db, max_db
                    )));
                }
            }
            SnrDistribution::Choice(values) => {
                if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
                    return Err(PrepError::InvalidInput(
                        "SNR choice set must be non-empty and finite".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Augmentation parameters per transform kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationSpec {
    /// Target SNR selection for noise mixing (default: uniform 5..20 dB)
    pub snr: SnrDistribution,

    /// Volume scale range `(min, max)` (default: 0.4..1.5)
    pub volume_range: (f32, f32),

    /// Time shift range in seconds, may be negative (default: -0.1..0.1)
    pub shift_range_secs: (f32, f32),

    /// Noise-mixed variants per source (default: 5)
    pub noise_variants: usize,

    /// Volume-perturbed variants per source (default: 3)
    pub volume_variants: usize,

    /// Time-shifted variants per source (default: 2)
    pub shift_variants: usize,
}

impl Default for AugmentationSpec {
    fn default() -> Self {
        Self {
            snr: SnrDistribution::Uniform {
                min_db: 5.0,
                max_db: 20.0,
            },
            volume_range: (0.4, 1.5),
            shift_range_secs: (-0.1, 0.1),
            noise_variants: 5,
            volume_variants: 3,
            shift_variants: 2,
        }
    }
}

impl AugmentationSpec {
    /// Total number of units emitted per source, clean copy included
    pub fn units_per_source(&self) -> usize {
        1 + self.noise_variants + self.volume_variants + self.shift_variants
    }
}

/// Pipeline configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    // Audio
    /// Sample rate in Hz of every raw container (default: 16000)
    pub sample_rate: u32,

    /// Standardized clip duration in seconds (default: 1.2)
    pub target_duration_secs: f32,

    // Framing
    /// Analysis frame length in seconds (default: 0.025)
    pub frame_length_secs: f32,

    /// Hop between frame starts in seconds (default: 0.010)
    pub hop_secs: f32,

    // Cepstral features
    /// Number of cepstral coefficients per frame (default: 40)
    pub n_coefficients: usize,

    /// Number of mel filterbank bands (default: 64)
    pub n_mels: usize,

    /// Dynamic range floor for log compression in dB, relative to the per-file
    /// maximum (default: Some(80.0)); `None` keeps the full range
    pub top_db: Option<f32>,

    /// Overrides the frame count the extractor checks against; derived from the
    /// framing arithmetic when `None`
    pub expected_frames: Option<usize>,

    // Augmentation
    /// Augmentation parameters
    pub augmentation: AugmentationSpec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            target_duration_secs: 1.2,
            frame_length_secs: 0.025,
            hop_secs: 0.010,
            n_coefficients: 40,
            n_mels: 64,
            top_db: Some(80.0),
            expected_frames: None,
            augmentation: AugmentationSpec::default(),
        }
    }
}

/// Convert a duration to a whole number of samples, truncating toward zero.
///
/// The tolerance absorbs `f32` representation error: `0.01f32` is slightly
/// below 0.01, and 16000 * 0.01 must land on 160 rather than 159.
fn secs_to_samples(sample_rate: u32, secs: f32) -> usize {
    let exact = sample_rate as f64 * secs as f64;
    (exact + 1e-2).floor().max(0.0) as usize
}

impl PipelineConfig {
    /// Standardized length in samples (19200 for the defaults)
    pub fn target_samples(&self) -> usize {
        secs_to_samples(self.sample_rate, self.target_duration_secs)
    }

    /// Frame length in samples (400 for the defaults)
    pub fn frame_length(&self) -> usize {
        secs_to_samples(self.sample_rate, self.frame_length_secs)
    }

    /// Hop length in samples (160 for the defaults)
    pub fn hop_length(&self) -> usize {
        secs_to_samples(self.sample_rate, self.hop_secs)
    }

    /// Frame count produced for a standardized buffer
    ///
    /// `floor((N - frame) / hop) + 1`, which is 118 for the defaults. Frames are
    /// not centered, so no half-frame padding is added at either end.
    pub fn expected_frames(&self) -> usize {
        if let Some(frames) = self.expected_frames {
            return frames;
        }
        frame_count(self.target_samples(), self.frame_length(), self.hop_length())
    }

    /// Expected feature matrix shape `(frames, coefficients)`
    pub fn expected_shape(&self) -> (usize, usize) {
        (self.expected_frames(), self.n_coefficients)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), PrepError> {
        if self.sample_rate == 0 {
            return Err(PrepError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if self.target_samples() == 0 {
            return Err(PrepError::InvalidInput(
                "Target duration must cover at least one sample".to_string(),
            ));
        }
        if self.frame_length() == 0 || self.hop_length() == 0 {
            return Err(PrepError::InvalidInput(format!(
                "Frame ({}) and hop ({}) must be > 0 samples",
                self.frame_length(),
                self.hop_length()
            )));
        }
        if self.frame_length() > self.target_samples() {
            return Err(PrepError::InvalidInput(format!(
                "Frame length ({}) exceeds target length ({})",
                self.frame_length(),
                self.target_samples()
            )));
        }
        if self.n_coefficients == 0 || self.n_mels == 0 {
            return Err(PrepError::InvalidInput(
                "Coefficient and mel band counts must be > 0".to_string(),
            ));
        }
        if self.n_coefficients > self.n_mels {
            return Err(PrepError::InvalidInput(format!(
                "Cannot take {} coefficients from {} mel bands",
                self.n_coefficients, self.n_mels
            )));
        }
        if let Some(top_db) = self.top_db {
            if !(top_db > 0.0) {
                return Err(PrepError::InvalidInput(format!(
                    "top_db must be positive, got {}",
                    top_db
                )));
            }
        }

        let aug = &self.augmentation;
        aug.snr.validate()?;
        let (vol_min, vol_max) = aug.volume_range;
        if !vol_min.is_finite() || !vol_max.is_finite() || vol_min < 0.0 || vol_min > vol_max {
            return Err(PrepError::InvalidInput(format!(
                "Invalid volume range: {}..{}",
                vol_min, vol_max
            )));
        }
        let (shift_min, shift_max) = aug.shift_range_secs;
        if !shift_min.is_finite() || !shift_max.is_finite() || shift_min > shift_max {
            return Err(PrepError::InvalidInput(format!(
                "Invalid shift range: {}..{}",
                shift_min, shift_max
            )));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self, PrepError> {
        let text = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn to_json_file(&self, path: &Path) -> Result<(), PrepError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Number of whole frames of `frame` samples, stepped by `hop`, that fit in `n`
pub fn frame_count(n: usize, frame: usize, hop: usize) -> usize {
    if frame == 0 || hop == 0 || n < frame {
        return 0;
    }
    (n - frame) / hop + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derived_sizes() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_samples(), 19_200);
        assert_eq!(config.frame_length(), 400);
        assert_eq!(config.hop_length(), 160);
        assert_eq!(config.expected_frames(), 118);
        assert_eq!(config.expected_shape(), (118, 40));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expected_frames_override() {
        let config = PipelineConfig {
            expected_frames: Some(121),
            ..PipelineConfig::default()
        };
        assert_eq!(config.expected_frames(), 121);
    }

    #[test]
    fn test_frame_count_edges() {
        assert_eq!(frame_count(400, 400, 160), 1);
        assert_eq!(frame_count(399, 400, 160), 0);
        assert_eq!(frame_count(560, 400, 160), 2);
        assert_eq!(frame_count(100, 0, 160), 0);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = PipelineConfig::default();
        config.n_coefficients = 80;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.augmentation.volume_range = (1.5, 0.4);
        assert!(config.validate().is_err());

        for bad in [(0.4, f32::INFINITY), (0.4, f32::NAN), (f32::NAN, 1.5), (-0.1, 1.0)] {
            let mut config = PipelineConfig::default();
            config.augmentation.volume_range = bad;
            assert!(config.validate().is_err(), "accepted {:?}", bad);
        }

        let mut config = PipelineConfig::default();
        config.augmentation.snr = SnrDistribution::Choice(vec![]);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.sample_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_units_per_source() {
        assert_eq!(AugmentationSpec::default().units_per_source(), 11);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = PipelineConfig::default();
        config.augmentation.snr = SnrDistribution::Choice(vec![-5.0, 0.0, 5.0]);
        config.to_json_file(&path).unwrap();

        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
