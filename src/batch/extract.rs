//! Batch feature extraction

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::{base_name, collect_inputs, run_parallel, BatchConfig};
use crate::config::PipelineConfig;
use crate::error::PrepError;
use crate::features::mfcc::{Extraction, MfccExtractor};
use crate::io::feature_file::{write_feature_file, FEATURE_EXTENSION};
use crate::io::pcm::read_pcm_file;
use crate::preprocessing::length::standardize;

/// Aggregate counts for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Feature files written
    pub processed: usize,
    /// Inputs that could not be decoded
    pub skipped: usize,
    /// Written files whose shape differed from the expectation
    pub shape_mismatches: usize,
    /// Inputs that could not be extracted or written, or whose name was
    /// already taken by another input
    pub failed: usize,
}

enum Outcome {
    Written { shape_matches: bool },
    Skipped,
    Failed,
}

/// Output path for the features of `input`
pub fn feature_path(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", base_name(input), FEATURE_EXTENSION))
}

/// Decode, standardize, extract and persist one input
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if the input cannot be decoded, or any
/// extraction or write error.
pub fn extract_file(
    input: &Path,
    output_dir: &Path,
    extractor: &MfccExtractor,
    config: &PipelineConfig,
) -> Result<(PathBuf, Extraction), PrepError> {
    let raw = read_pcm_file(input, config.sample_rate)?;
    let buffer = standardize(raw, config.target_samples());
    let extraction = extractor.extract(&buffer)?;

    let out = feature_path(input, output_dir);
    write_feature_file(&out, &extraction.matrix)?;
    Ok((out, extraction))
}

/// Extract features for every eligible input in `batch.input_dir`
///
/// # Errors
///
/// Only setup failures are returned (invalid configuration, unreadable input
/// directory, uncreatable output directory). Per-file problems are counted in
/// the report.
pub fn extract_directory(
    batch: &BatchConfig,
    config: &PipelineConfig,
) -> Result<ExtractReport, PrepError> {
    let extractor = MfccExtractor::new(config)?;
    let inputs = collect_inputs(&batch.input_dir, &batch.extensions)?;
    std::fs::create_dir_all(&batch.output_dir)?;

    log::info!(
        "Extracting features: {} inputs from {} (jobs={})",
        inputs.files.len(),
        batch.input_dir.display(),
        batch.jobs
    );

    let outcomes = run_parallel(batch.jobs, &inputs.files, |_, path| {
        match extract_file(path, &batch.output_dir, &extractor, config) {
            Ok((out, extraction)) => {
                log::debug!(
                    "{} -> {} {:?}",
                    path.display(),
                    out.display(),
                    extraction.matrix.shape()
                );
                Outcome::Written {
                    shape_matches: extraction.shape_matches,
                }
            }
            Err(PrepError::DecodingError(msg)) => {
                log::warn!("Skipping {}: {}", path.display(), msg);
                Outcome::Skipped
            }
            Err(e) => {
                log::warn!("Failed {}: {}", path.display(), e);
                Outcome::Failed
            }
        }
    })?;

    let mut report = ExtractReport {
        failed: inputs.duplicates.len(),
        ..ExtractReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Written { shape_matches } => {
                report.processed += 1;
                if !shape_matches {
                    report.shape_mismatches += 1;
                }
            }
            Outcome::Skipped => report.skipped += 1,
            Outcome::Failed => report.failed += 1,
        }
    }

    log::info!(
        "Extraction done: processed={} skipped={} shape_mismatches={} failed={}",
        report.processed,
        report.skipped,
        report.shape_mismatches,
        report.failed
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::feature_file::read_feature_file;
    use crate::io::pcm::write_pcm_file;
    use crate::io::sample_buffer::AudioBuffer;

    fn tone(len: usize) -> AudioBuffer {
        AudioBuffer::new(
            (0..len)
                .map(|i| 0.3 * (2.0 * std::f32::consts::PI * 700.0 * i as f32 / 16_000.0).sin()
                    * (i as f32 / len as f32))
                .collect(),
            16_000,
        )
    }

    #[test]
    fn test_corrupt_and_valid() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("broken.bin"), b"").unwrap();
        write_pcm_file(&input.path().join("good.bin"), &tone(12_000)).unwrap();

        let batch = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            ..BatchConfig::default()
        };
        let report = extract_directory(&batch, &PipelineConfig::default()).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.shape_mismatches, 0);

        let written: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
        assert_eq!(written.len(), 1);

        let matrix = read_feature_file(&output.path().join("good.mfcc"), 40).unwrap();
        assert_eq!(matrix.shape(), (118, 40));
    }

    #[test]
    fn test_shape_mismatch_still_written() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pcm_file(&input.path().join("1.pcm"), &tone(19_200)).unwrap();

        let batch = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            ..BatchConfig::default()
        };
        let config = PipelineConfig {
            expected_frames: Some(121),
            ..PipelineConfig::default()
        };
        let report = extract_directory(&batch, &config).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.shape_mismatches, 1);
        assert!(output.path().join("1.mfcc").exists());
    }

    #[test]
    fn test_shared_stem_counted_as_failed() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pcm_file(&input.path().join("a.bin"), &tone(16_000)).unwrap();
        write_pcm_file(&input.path().join("a.pcm"), &tone(8_000)).unwrap();

        let batch = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            jobs: 2,
            ..BatchConfig::default()
        };
        let report = extract_directory(&batch, &PipelineConfig::default()).unwrap();

        let written = std::fs::read_dir(output.path()).unwrap().count();
        assert_eq!(report.processed, written);
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
    }
}
