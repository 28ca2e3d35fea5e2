//! Mel filterbank
//!
//! Triangular filters spaced evenly on the Slaney mel scale (linear below
//! 1 kHz, logarithmic above) with area normalization, so each filter has
//! unit-ish energy regardless of bandwidth.
//!
//! # Reference
//!
//! Slaney, M. (1998). Auditory Toolbox, Version 2. Interval Research Corporation.

/// Slaney mel scale: frequency in Hz to mels
pub fn hz_to_mel(freq: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;
    let logstep = 6.4f64.ln() / 27.0;

    if freq >= MIN_LOG_HZ {
        MIN_LOG_MEL + (freq / MIN_LOG_HZ).ln() / logstep
    } else {
        freq / F_SP
    }
}

/// Slaney mel scale: mels to frequency in Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;
    let logstep = 6.4f64.ln() / 27.0;

    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (logstep * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Dense `n_mels × n_bins` filterbank over a one-sided power spectrum
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    weights: Vec<f32>,
    n_mels: usize,
    n_bins: usize,
}

impl MelFilterbank {
    /// Build filters for an `n_fft`-point spectrum covering `0..=sample_rate/2`
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let sr = sample_rate as f64;

        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sr / n_fft as f64)
            .collect();

        let mel_min = hz_to_mel(0.0);
        let mel_max = hz_to_mel(sr / 2.0);
        let mel_points: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
            .collect();

        let mut weights = vec![0.0f32; n_mels * n_bins];
        let mut empty = 0;
        for m in 0..n_mels {
            let lower = mel_points[m];
            let center = mel_points[m + 1];
            let upper = mel_points[m + 2];
            let enorm = 2.0 / (upper - lower);
            let mut total = 0.0;

            for (k, &f) in fft_freqs.iter().enumerate() {
                let rising = (f - lower) / (center - lower);
                let falling = (upper - f) / (upper - center);
                let w = rising.min(falling).max(0.0) * enorm;
                weights[m * n_bins + k] = w as f32;
                total += w;
            }

            if total == 0.0 {
                empty += 1;
            }
        }

        if empty > 0 {
            log::warn!(
                "{} of {} mel filters cover no FFT bin (n_fft={}); consider fewer mel bands",
                empty,
                n_mels,
                n_fft
            );
        }

        Self {
            weights,
            n_mels,
            n_bins,
        }
    }

    /// Number of mel bands
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Number of spectrum bins each filter spans
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Weights of one filter
    pub fn filter(&self, m: usize) -> &[f32] {
        &self.weights[m * self.n_bins..(m + 1) * self.n_bins]
    }

    /// Project a power spectrum onto the mel bands
    ///
    /// `power` must hold `n_bins` values and `out` `n_mels` values.
    pub fn apply(&self, power: &[f32], out: &mut [f32]) {
        for (m, energy) in out.iter_mut().enumerate().take(self.n_mels) {
            *energy = self
                .filter(m)
                .iter()
                .zip(power)
                .map(|(&w, &p)| w * p)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_round_trip() {
        for hz in [0.0, 100.0, 999.0, 1000.0, 4000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
        // Linear region: 1000 Hz is 15 mels
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_filterbank_shape_and_coverage() {
        let fb = MelFilterbank::new(16_000, 400, 64);
        assert_eq!(fb.n_bins(), 201);
        assert_eq!(fb.n_mels(), 64);
        for m in 0..64 {
            assert!(fb.filter(m).iter().any(|&w| w > 0.0), "filter {} is empty", m);
            assert!(fb.filter(m).iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_apply_picks_out_band() {
        let fb = MelFilterbank::new(16_000, 400, 40);
        // Energy only at bin 50 (2 kHz)
        let mut power = vec![0.0f32; 201];
        power[50] = 1.0;
        let mut out = vec![0.0f32; 40];
        fb.apply(&power, &mut out);

        let nonzero = out.iter().filter(|&&e| e > 0.0).count();
        assert!((1..=2).contains(&nonzero));
    }
}
