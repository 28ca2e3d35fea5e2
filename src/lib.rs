//! # KWS DSP
//!
//! Data preparation for keyword-spotting models: turns raw 16-bit PCM captures
//! into augmented training units and per-file normalized MFCC matrices.
//!
//! ## Features
//!
//! - **PCM codec**: headerless little-endian i16 to normalized `f32` and back
//! - **Length standardization**: zero-pad or truncate to a fixed clip length
//! - **Augmentation**: noise mixing at a controlled SNR, volume perturbation,
//!   and zero-filled time shifts, all driven by an injectable random source
//! - **MFCC extraction**: Hann-windowed STFT, Slaney mel filterbank, log
//!   compression, orthonormal DCT-II, then per-coefficient z-score
//! - **Batch orchestration**: directory runs over a bounded worker pool with
//!   per-file error isolation
//!
//! ## Quick Start
//!
//! ```no_run
//! use kws_dsp::{prepare_features, PipelineConfig};
//!
//! let raw = std::fs::read("capture.bin")?;
//! let config = PipelineConfig::default();
//! let features = prepare_features(&raw, &config)?;
//!
//! println!("MFCC shape: {:?}", features.shape());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! raw PCM → decode → standardize ─┬→ augment → encode → .bin units
//!                                 └→ MFCC → z-score → .mfcc matrix
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod augmentation;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use augmentation::noise::NoiseLibrary;
pub use augmentation::random::{RandomSource, SeededRandom};
pub use augmentation::{AugmentationEngine, AugmentedVariant};
pub use batch::BatchConfig;
pub use config::{AugmentationSpec, PipelineConfig, SnrDistribution};
pub use error::PrepError;
pub use features::matrix::FeatureMatrix;
pub use features::mfcc::{Extraction, MfccExtractor};
pub use io::sample_buffer::AudioBuffer;

/// Decode one raw capture, standardize its length and extract normalized MFCCs
///
/// Builds a one-off [`MfccExtractor`]; when processing many captures, build
/// the extractor once and call [`MfccExtractor::extract`] instead.
///
/// # Arguments
///
/// * `raw` - Headerless little-endian 16-bit PCM bytes
/// * `config` - Pipeline parameters (sample rate, clip length, framing)
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if `raw` holds no complete sample, or
/// `PrepError::InvalidInput` if the configuration is inconsistent.
pub fn prepare_features(raw: &[u8], config: &PipelineConfig) -> Result<FeatureMatrix, PrepError> {
    let buffer = io::pcm::decode(raw, config.sample_rate)?;
    let buffer = preprocessing::length::standardize(buffer, config.target_samples());
    let extractor = MfccExtractor::new(config)?;
    let extraction = extractor.extract(&buffer)?;
    Ok(extraction.matrix)
}

/// Decode one raw capture, standardize it and generate its augmentation family
///
/// The returned units are ordered clean, noise, volume, shift.
///
/// # Example
///
/// ```
/// use kws_dsp::{augment_capture, AudioBuffer, NoiseLibrary, PipelineConfig, SeededRandom};
/// use kws_dsp::io::pcm::encode;
///
/// let config = PipelineConfig::default();
/// let noise = NoiseLibrary::new(AudioBuffer::new(vec![0.05, -0.05, 0.02], 16000))?;
/// let raw = encode(&AudioBuffer::new(vec![0.2; 8000], 16000));
///
/// let mut rng = SeededRandom::new(7);
/// let units = augment_capture(&raw, &config, &noise, &mut rng)?;
/// assert_eq!(units.len(), config.augmentation.units_per_source());
/// assert!(units.iter().all(|u| u.buffer.len() == config.target_samples()));
/// # Ok::<(), kws_dsp::PrepError>(())
/// ```
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if `raw` holds no complete sample.
pub fn augment_capture<R: RandomSource + ?Sized>(
    raw: &[u8],
    config: &PipelineConfig,
    library: &NoiseLibrary,
    rng: &mut R,
) -> Result<Vec<AugmentedVariant>, PrepError> {
    config.validate()?;
    let buffer = io::pcm::decode(raw, config.sample_rate)?;
    let source = preprocessing::length::standardize(buffer, config.target_samples());
    let engine = AugmentationEngine::new(&config.augmentation, library);
    Ok(engine.augment(&source, rng))
}
