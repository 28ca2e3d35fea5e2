//! Per-file coefficient normalization
//!
//! Each coefficient column is z-scored across the frames of one file:
//! `x' = (x - mean) / std`, using the population standard deviation.
//!
//! A column whose standard deviation is below [`STD_EPSILON`] carries no
//! information over time (silent or perfectly stationary input). Dividing by
//! it would blow up or produce NaN, so such a column is only mean-subtracted
//! and ends up exactly 0.0.

use crate::features::matrix::FeatureMatrix;

/// Standard deviation below which a column is treated as constant
pub const STD_EPSILON: f64 = 1e-8;

/// Z-score every column in place
///
/// # Returns
///
/// Number of constant columns that were zeroed instead of scaled
pub fn normalize_columns(matrix: &mut FeatureMatrix) -> usize {
    let (n_frames, n_coefficients) = matrix.shape();
    if n_frames == 0 {
        return 0;
    }

    let stats: Vec<(f64, f64)> = (0..n_coefficients)
        .map(|c| matrix.column_stats(c))
        .collect();

    let mut guarded = 0;
    for &(_, std) in &stats {
        if std < STD_EPSILON {
            guarded += 1;
        }
    }

    for t in 0..n_frames {
        let row = matrix.row_mut(t);
        for (value, &(mean, std)) in row.iter_mut().zip(&stats) {
            *value = if std < STD_EPSILON {
                0.0
            } else {
                ((*value as f64 - mean) / std) as f32
            };
        }
    }

    if guarded > 0 {
        log::debug!(
            "{} of {} coefficient columns are constant over time, zeroed",
            guarded,
            n_coefficients
        );
    }

    guarded
}
