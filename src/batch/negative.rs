//! Batch negative sample generation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::augmentation::naming::{negative_stem, noise_slice_stem, PCM_EXTENSION};
use crate::augmentation::negative::{mix_negative, slice_noise};
use crate::augmentation::random::SeededRandom;
use crate::batch::augment::load_noise_library;
use crate::batch::{base_name, collect_inputs, run_parallel, BatchConfig};
use crate::config::{PipelineConfig, SnrDistribution};
use crate::error::PrepError;
use crate::io::pcm::{read_pcm_file, write_pcm_file};
use crate::preprocessing::length::standardize;

/// A labeled directory of non-keyword speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeSource {
    /// Label prefixed to output names, e.g. `CONF` or `DAILY`
    pub label: String,
    /// Directory of raw captures
    pub dir: PathBuf,
}

/// Settings for negative generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeSpec {
    /// Speech directories to mix with noise
    pub sources: Vec<NegativeSource>,
    /// SNR selection (default: choice of -5, 0, 5, 10, 15 dB)
    pub snr: SnrDistribution,
    /// Noise-mixed copies per speech capture (default: 5)
    pub variants_per_source: usize,
    /// Whether to also write pure-noise slices (default: true)
    pub slice_noise: bool,
}

impl Default for NegativeSpec {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            snr: SnrDistribution::Choice(vec![-5.0, 0.0, 5.0, 10.0, 15.0]),
            variants_per_source: 5,
            slice_noise: true,
        }
    }
}

/// Aggregate counts for one negative generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NegativeReport {
    /// Pure-noise slices written
    pub noise_slices: usize,
    /// Noise-mixed speech units written
    pub mixed: usize,
    /// Speech inputs that could not be decoded
    pub skipped: usize,
    /// Speech inputs whose units could not all be written, or whose name was
    /// already taken by another input
    pub failed: usize,
}

/// Write noise slices and noise-mixed speech negatives to `batch.output_dir`
///
/// `batch.input_dir` is not used; speech comes from `spec.sources`.
pub fn generate_negatives(
    batch: &BatchConfig,
    config: &PipelineConfig,
    spec: &NegativeSpec,
) -> Result<NegativeReport, PrepError> {
    config.validate()?;
    let library = load_noise_library(batch, config)?;
    std::fs::create_dir_all(&batch.output_dir)?;
    let clip_len = config.target_samples();

    let mut report = NegativeReport::default();

    if spec.slice_noise {
        for (i, slice) in slice_noise(&library, clip_len).iter().enumerate() {
            let path = batch
                .output_dir
                .join(format!("{}.{}", noise_slice_stem(i), PCM_EXTENSION));
            write_pcm_file(&path, slice)?;
            report.noise_slices += 1;
        }
        log::info!("Wrote {} pure-noise negatives", report.noise_slices);
    }

    for (source_idx, source) in spec.sources.iter().enumerate() {
        let inputs = collect_inputs(&source.dir, &batch.extensions)?;
        log::info!(
            "Mixing {} {} captures ({} variants each)",
            inputs.files.len(),
            source.label,
            spec.variants_per_source
        );

        let outcomes = run_parallel(batch.jobs, &inputs.files, |index, path| -> Result<usize, PrepError> {
            let stream = ((source_idx as u64) << 32) | index as u64;
            let mut rng = SeededRandom::for_unit(batch.seed, stream);
            let raw = read_pcm_file(path, config.sample_rate)?;
            let speech = standardize(raw, clip_len);
            let base = base_name(path);

            let variants =
                mix_negative(&speech, &library, &spec.snr, spec.variants_per_source, &mut rng);
            for (j, variant) in variants.iter().enumerate() {
                let out = batch.output_dir.join(format!(
                    "{}.{}",
                    negative_stem(&source.label, &base, j, variant.snr_db),
                    PCM_EXTENSION
                ));
                write_pcm_file(&out, &variant.buffer)?;
            }
            Ok(variants.len())
        })?;

        report.failed += inputs.duplicates.len();
        for (outcome, path) in outcomes.into_iter().zip(&inputs.files) {
            match outcome {
                Ok(count) => report.mixed += count,
                Err(PrepError::DecodingError(msg)) => {
                    log::warn!("Skipping {}: {}", path.display(), msg);
                    report.skipped += 1;
                }
                Err(e) => {
                    log::warn!("Failed {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }
    }

    log::info!(
        "Negatives done: noise_slices={} mixed={} skipped={} failed={}",
        report.noise_slices,
        report.mixed,
        report.skipped,
        report.failed
    );

    Ok(report)
}
