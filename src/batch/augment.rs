//! Batch augmentation

use std::path::Path;

use serde::Serialize;

use crate::augmentation::naming::SampleRecord;
use crate::augmentation::noise::NoiseLibrary;
use crate::augmentation::random::SeededRandom;
use crate::augmentation::AugmentationEngine;
use crate::batch::{base_name, collect_inputs, run_parallel, BatchConfig};
use crate::config::PipelineConfig;
use crate::error::PrepError;
use crate::io::pcm::{read_pcm_file, write_pcm_file};
use crate::preprocessing::length::standardize;

/// Aggregate counts for one augmentation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AugmentReport {
    /// Sources fully augmented
    pub sources: usize,
    /// Units written, clean copies included
    pub generated: usize,
    /// Inputs that could not be decoded
    pub skipped: usize,
    /// Inputs whose units could not all be written, or whose name was
    /// already taken by another input
    pub failed: usize,
}

/// Load the batch's noise library
///
/// # Errors
///
/// Returns `PrepError::NoiseLibrary` if no path is configured or the file is
/// missing or empty.
pub fn load_noise_library(
    batch: &BatchConfig,
    config: &PipelineConfig,
) -> Result<NoiseLibrary, PrepError> {
    let path = batch.noise_path.as_deref().ok_or_else(|| {
        PrepError::NoiseLibrary("no noise library path configured".to_string())
    })?;
    NoiseLibrary::load(path, config.sample_rate)
}

/// Decode, standardize and augment one source, writing every unit
pub fn augment_file(
    input: &Path,
    output_dir: &Path,
    engine: &AugmentationEngine<'_>,
    config: &PipelineConfig,
    rng: &mut SeededRandom,
) -> Result<Vec<SampleRecord>, PrepError> {
    let raw = read_pcm_file(input, config.sample_rate)?;
    let source = standardize(raw, config.target_samples());
    let base = base_name(input);

    let mut records = Vec::new();
    for variant in engine.augment(&source, rng) {
        let record = SampleRecord::new(&base, variant.kind, variant.index, output_dir);
        write_pcm_file(&record.path, &variant.buffer)?;
        records.push(record);
    }
    Ok(records)
}

/// Augment every eligible input in `batch.input_dir`
///
/// The noise library is loaded before any per-file work; failing to load it
/// aborts the run.
pub fn augment_directory(
    batch: &BatchConfig,
    config: &PipelineConfig,
) -> Result<AugmentReport, PrepError> {
    config.validate()?;
    let library = load_noise_library(batch, config)?;
    let inputs = collect_inputs(&batch.input_dir, &batch.extensions)?;
    std::fs::create_dir_all(&batch.output_dir)?;

    let engine = AugmentationEngine::new(&config.augmentation, &library);
    log::info!(
        "Augmenting {} sources from {} into {} ({} units each, jobs={})",
        inputs.files.len(),
        batch.input_dir.display(),
        batch.output_dir.display(),
        config.augmentation.units_per_source(),
        batch.jobs
    );

    let outcomes = run_parallel(batch.jobs, &inputs.files, |index, path| {
        let mut rng = SeededRandom::for_unit(batch.seed, index as u64);
        let result = augment_file(path, &batch.output_dir, &engine, config, &mut rng);
        if let Err(e) = &result {
            log::warn!("Skipping {}: {}", path.display(), e);
        }
        result
    })?;

    let mut report = AugmentReport {
        failed: inputs.duplicates.len(),
        ..AugmentReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(records) => {
                report.sources += 1;
                report.generated += records.len();
            }
            Err(PrepError::DecodingError(_)) => report.skipped += 1,
            Err(_) => report.failed += 1,
        }
    }

    log::info!(
        "Augmentation done: sources={} generated={} skipped={} failed={}",
        report.sources,
        report.generated,
        report.skipped,
        report.failed
    );

    Ok(report)
}
