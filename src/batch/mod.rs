//! Batch orchestration
//!
//! Drives the pipeline over a directory of raw captures:
//! - [`extract`]: decode → standardize → MFCC → `.mfcc` file
//! - [`augment`]: decode → standardize → augmentation family → `.bin` files
//! - [`negative`]: noise slices and noise-mixed non-keyword speech
//!
//! Inputs are processed independently. A file that fails to decode is logged
//! and counted, and the batch moves on. Work is spread over a bounded rayon
//! pool; the per-file random stream is derived from the batch seed and the
//! file's position in sorted order, so results do not depend on `jobs`.

pub mod augment;
pub mod extract;
pub mod negative;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// Directories and run settings for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory scanned for input units
    pub input_dir: PathBuf,

    /// Directory receiving outputs (created if missing)
    pub output_dir: PathBuf,

    /// Raw PCM noise library, required for augmentation and negatives
    pub noise_path: Option<PathBuf>,

    /// Accepted input extensions, compared case-insensitively
    /// (default: bin, pcm, raw)
    pub extensions: Vec<String>,

    /// Worker threads (default: 1, sequential)
    pub jobs: usize,

    /// Base seed for augmentation randomness (default: 0)
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/out"),
            noise_path: None,
            extensions: vec!["bin".to_string(), "pcm".to_string(), "raw".to_string()],
            jobs: 1,
            seed: 0,
        }
    }
}

/// Eligible inputs of one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    /// Inputs to process, sorted by path, with unique stems
    pub files: Vec<PathBuf>,
    /// Inputs whose stem was already taken by an earlier file; outputs are
    /// named by stem, so these would overwrite another input's results
    pub duplicates: Vec<PathBuf>,
}

/// List eligible files in `dir`, sorted by path
///
/// When two files share a stem (`a.bin`, `a.pcm`), the first in sorted order
/// is kept and the others are set aside in [`InputSet::duplicates`].
///
/// # Errors
///
/// Returns `PrepError::Io` if the directory cannot be read.
pub fn collect_inputs(dir: &Path, extensions: &[String]) -> Result<InputSet, PrepError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PrepError::Io(format!("cannot scan {}: {}", dir.display(), e))
    })?;

    let mut eligible = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if matches {
            eligible.push(path);
        }
    }
    eligible.sort();

    let mut inputs = InputSet::default();
    let mut stems = HashSet::new();
    for path in eligible {
        if stems.insert(base_name(&path)) {
            inputs.files.push(path);
        } else {
            log::warn!(
                "Ignoring {}: another input already uses the name {}",
                path.display(),
                base_name(&path)
            );
            inputs.duplicates.push(path);
        }
    }

    log::debug!(
        "Found {} eligible inputs in {} ({} duplicate names)",
        inputs.files.len(),
        dir.display(),
        inputs.duplicates.len()
    );
    Ok(inputs)
}

/// File stem of `path` as an owned string
pub(crate) fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}

/// Map `work` over `inputs` on a pool of `jobs` threads, preserving order
pub(crate) fn run_parallel<T, F>(jobs: usize, inputs: &[PathBuf], work: F) -> Result<Vec<T>, PrepError>
where
    T: Send,
    F: Fn(usize, &Path) -> T + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .map_err(|e| PrepError::ProcessingError(format!("cannot build worker pool: {}", e)))?;

    Ok(pool.install(|| {
        inputs
            .par_iter()
            .enumerate()
            .map(|(index, path)| work(index, path))
            .collect()
    }))
}
