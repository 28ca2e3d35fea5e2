//! Signal level metering
//!
//! Power and amplitude measurements shared by noise mixing and diagnostics.
//! Sums are accumulated in `f64` so that the SNR arithmetic on long, quiet
//! buffers does not lose precision.

/// Numerical stability floor for dB conversion
const EPSILON: f64 = 1e-20;

/// Mean power `mean(x²)`; zero for an empty slice
pub fn mean_power(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    sum_sq / samples.len() as f64
}

/// Root-mean-square amplitude
pub fn rms(samples: &[f32]) -> f64 {
    mean_power(samples).sqrt()
}

/// Largest absolute sample value; zero for an empty slice
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
}

/// Power ratio in dB, `-inf` for zero power
pub fn power_to_db(power: f64) -> f64 {
    if power <= EPSILON {
        return f64::NEG_INFINITY;
    }
    10.0 * power.log10()
}

/// Linear power ratio for a dB value
pub fn db_to_power(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Divide by the peak if it exceeds full scale
///
/// Returns the peak that was divided out, or `None` if the buffer was already
/// within [-1.0, 1.0].
pub fn rescale_if_clipping(samples: &mut [f32]) -> Option<f32> {
    let max_val = peak(samples);
    if max_val > 1.0 {
        for sample in samples.iter_mut() {
            *sample /= max_val;
        }
        Some(max_val)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0).sin())
            .collect()
    }

    #[test]
    fn test_sine_power() {
        let samples = sine(16_000, 0.5);
        // Sine power is A²/2
        assert!((mean_power(&samples) - 0.125).abs() < 1e-4);
        assert!((rms(&samples) - 0.5 / 2f64.sqrt()).abs() < 1e-4);
        assert!((peak(&samples) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_empty_and_silent() {
        assert_eq!(mean_power(&[]), 0.0);
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(power_to_db(mean_power(&[0.0; 64])), f64::NEG_INFINITY);
    }

    #[test]
    fn test_db_conversions() {
        assert!((db_to_power(10.0) - 10.0).abs() < 1e-12);
        assert!((power_to_db(100.0) - 20.0).abs() < 1e-12);
        assert!((power_to_db(db_to_power(-7.5)) + 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_only_when_clipping() {
        let mut quiet = vec![0.2, -0.9, 0.5];
        assert_eq!(rescale_if_clipping(&mut quiet), None);
        assert_eq!(quiet, vec![0.2, -0.9, 0.5]);

        let mut loud = vec![0.5, -2.0, 1.0];
        assert_eq!(rescale_if_clipping(&mut loud), Some(2.0));
        assert_eq!(loud, vec![0.25, -1.0, 0.5]);
    }
}
