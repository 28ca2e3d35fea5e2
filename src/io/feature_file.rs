//! Feature matrix container
//!
//! A feature file is a headerless row-major matrix of little-endian `f32`
//! values, one row per time frame. The coefficient count is not stored, so the
//! reader must be told how many columns to expect.

use std::path::Path;

use crate::error::PrepError;
use crate::features::matrix::FeatureMatrix;

/// File extension for persisted feature matrices
pub const FEATURE_EXTENSION: &str = "mfcc";

const BYTES_PER_VALUE: usize = 4;

/// Serialize a matrix row-major as little-endian `f32`
pub fn encode_matrix(matrix: &FeatureMatrix) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(matrix.data().len() * BYTES_PER_VALUE);
    for &value in matrix.data() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Parse a row-major little-endian `f32` matrix with `n_coefficients` columns
///
/// # Errors
///
/// Returns `PrepError::DecodingError` if the byte count is not a whole number
/// of rows.
pub fn decode_matrix(bytes: &[u8], n_coefficients: usize) -> Result<FeatureMatrix, PrepError> {
    let row_bytes = n_coefficients * BYTES_PER_VALUE;
    if row_bytes == 0 || bytes.len() % row_bytes != 0 {
        return Err(PrepError::DecodingError(format!(
            "{} bytes is not a whole number of {}-coefficient rows",
            bytes.len(),
            n_coefficients
        )));
    }

    let data: Vec<f32> = bytes
        .chunks_exact(BYTES_PER_VALUE)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    let n_frames = data.len() / n_coefficients;
    FeatureMatrix::from_row_major(data, n_frames, n_coefficients)
}

/// Write a matrix to `path`
pub fn write_feature_file(path: &Path, matrix: &FeatureMatrix) -> Result<(), PrepError> {
    std::fs::write(path, encode_matrix(matrix))?;
    log::debug!(
        "Wrote {}x{} feature matrix to {}",
        matrix.n_frames(),
        matrix.n_coefficients(),
        path.display()
    );
    Ok(())
}

/// Read a matrix with `n_coefficients` columns from `path`
pub fn read_feature_file(path: &Path, n_coefficients: usize) -> Result<FeatureMatrix, PrepError> {
    let bytes = std::fs::read(path)?;
    decode_matrix(&bytes, n_coefficients)
}
