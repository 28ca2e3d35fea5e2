//! Time-major feature matrix

use crate::error::PrepError;

/// Cepstral features laid out `[time_frame][coefficient]`, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    n_frames: usize,
    n_coefficients: usize,
}

impl FeatureMatrix {
    /// Zero-filled matrix of shape `(n_frames, n_coefficients)`
    pub fn zeros(n_frames: usize, n_coefficients: usize) -> Self {
        Self {
            data: vec![0.0; n_frames * n_coefficients],
            n_frames,
            n_coefficients,
        }
    }

    /// Build from row-major data
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidInput` if `data.len() != n_frames * n_coefficients`.
    pub fn from_row_major(
        data: Vec<f32>,
        n_frames: usize,
        n_coefficients: usize,
    ) -> Result<Self, PrepError> {
        if data.len() != n_frames * n_coefficients {
            return Err(PrepError::InvalidInput(format!(
                "{} values cannot form a {}x{} matrix",
                data.len(),
                n_frames,
                n_coefficients
            )));
        }
        Ok(Self {
            data,
            n_frames,
            n_coefficients,
        })
    }

    /// `(frames, coefficients)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_frames, self.n_coefficients)
    }

    /// Number of time frames (rows)
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Number of coefficients per frame (columns)
    pub fn n_coefficients(&self) -> usize {
        self.n_coefficients
    }

    /// Row-major backing data
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at `(frame, coefficient)`
    pub fn get(&self, frame: usize, coefficient: usize) -> f32 {
        self.data[frame * self.n_coefficients + coefficient]
    }

    /// All coefficients of one frame
    pub fn row(&self, frame: usize) -> &[f32] {
        let start = frame * self.n_coefficients;
        &self.data[start..start + self.n_coefficients]
    }

    /// Mutable coefficients of one frame
    pub fn row_mut(&mut self, frame: usize) -> &mut [f32] {
        let start = frame * self.n_coefficients;
        &mut self.data[start..start + self.n_coefficients]
    }

    /// One coefficient across all frames
    pub fn column(&self, coefficient: usize) -> Vec<f32> {
        (0..self.n_frames)
            .map(|t| self.get(t, coefficient))
            .collect()
    }

    /// Population mean and standard deviation of one column
    pub fn column_stats(&self, coefficient: usize) -> (f64, f64) {
        if self.n_frames == 0 {
            return (0.0, 0.0);
        }
        let n = self.n_frames as f64;
        let mean = (0..self.n_frames)
            .map(|t| self.get(t, coefficient) as f64)
            .sum::<f64>()
            / n;
        let var = (0..self.n_frames)
            .map(|t| {
                let d = self.get(t, coefficient) as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean, var.sqrt())
    }

    /// True if every value is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_is_time_major() {
        let m = FeatureMatrix::from_row_major((0..6).map(|v| v as f32).collect(), 3, 2).unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(2, 1), 5.0);
        assert_eq!(m.row(1), &[2.0, 3.0]);
        assert_eq!(m.column(0), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(FeatureMatrix::from_row_major(vec![0.0; 5], 2, 3).is_err());
    }

    #[test]
    fn test_column_stats() {
        let m = FeatureMatrix::from_row_major(vec![1.0, 0.0, 3.0, 0.0], 2, 2).unwrap();
        let (mean, std) = m.column_stats(0);
        assert!((mean - 2.0).abs() < 1e-12);
        assert!((std - 1.0).abs() < 1e-12);
        assert_eq!(m.column_stats(1), (0.0, 0.0));
    }
}
