//! SNR-controlled background noise mixing
//!
//! Mixes a window of a shared noise recording into a signal at a target
//! signal-to-noise ratio.
//!
//! # Algorithm
//!
//! 1. If the noise library is shorter than the signal, treat it as looped
//!    (tiled) until it covers the signal; the library itself is never rewritten
//! 2. Pick a uniformly random start so a window of the signal's length fits
//! 3. Draw a target SNR in dB
//! 4. `P_s = mean(S²)`, `P_n = mean(segment²)`; if either is zero, return S
//! 5. `g = sqrt((P_s / 10^(SNR/10)) / P_n)`, `mixed = S + g * segment`
//! 6. If `max|mixed| > 1`, divide the whole buffer by that peak
//!
//! The final rescale keeps the SNR intact since it scales signal and noise
//! together.

use std::path::Path;

use crate::augmentation::random::RandomSource;
use crate::config::SnrDistribution;
use crate::error::PrepError;
use crate::io::pcm::read_pcm_file;
use crate::io::sample_buffer::AudioBuffer;
use crate::preprocessing::level::{db_to_power, mean_power, power_to_db, rescale_if_clipping, rms};

/// Read-only background noise shared by every mixing call in a run
#[derive(Debug, Clone)]
pub struct NoiseLibrary {
    buffer: AudioBuffer,
}

impl NoiseLibrary {
    /// Wrap a decoded noise recording
    ///
    /// # Errors
    ///
    /// Returns `PrepError::NoiseLibrary` if the buffer holds no samples.
    pub fn new(buffer: AudioBuffer) -> Result<Self, PrepError> {
        if buffer.is_empty() {
            return Err(PrepError::NoiseLibrary(
                "Noise library is empty".to_string(),
            ));
        }
        if mean_power(buffer.samples()) == 0.0 {
            log::warn!("Noise library is digital silence; noise mixing will be a no-op");
        }
        Ok(Self { buffer })
    }

    /// Load a noise library from a raw PCM file
    ///
    /// # Errors
    ///
    /// Returns `PrepError::NoiseLibrary` if the file is missing, unreadable or empty.
    pub fn load(path: &Path, sample_rate: u32) -> Result<Self, PrepError> {
        let buffer = read_pcm_file(path, sample_rate).map_err(|e| {
            PrepError::NoiseLibrary(format!("cannot load {}: {}", path.display(), e))
        })?;
        log::info!(
            "Loaded noise library {} ({} samples, {:.1} s)",
            path.display(),
            buffer.len(),
            buffer.duration_secs()
        );
        Self::new(buffer)
    }

    /// Length in samples
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; an empty library cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }

    /// Borrow the noise samples
    pub fn samples(&self) -> &[f32] {
        self.buffer.samples()
    }

    /// Length of the library after tiling it to cover `window` samples
    ///
    /// Equal to the library length when it already covers the window, else the
    /// smallest whole number of repetitions that reaches `window`.
    pub fn looped_len(&self, window: usize) -> usize {
        let len = self.len();
        if len >= window {
            len
        } else {
            len * window.div_ceil(len)
        }
    }

    /// Copy `window` samples of the looped library starting at `start`
    pub fn segment(&self, start: usize, window: usize) -> Vec<f32> {
        let samples = self.samples();
        let len = samples.len();
        (0..window).map(|i| samples[(start + i) % len]).collect()
    }

    /// Copy a uniformly placed window of `window` samples
    pub fn random_segment<R: RandomSource + ?Sized>(&self, window: usize, rng: &mut R) -> Vec<f32> {
        let max_start = self.looped_len(window) - window;
        let start = rng.index_inclusive(max_start);
        self.segment(start, window)
    }
}

/// Draw a target SNR in dB
pub fn draw_snr<R: RandomSource + ?Sized>(snr: &SnrDistribution, rng: &mut R) -> f32 {
    match snr {
        SnrDistribution::Uniform { min_db, max_db } => rng.uniform(*min_db, *max_db),
        SnrDistribution::Choice(values) => {
            if values.is_empty() {
                return 0.0;
            }
            values[rng.index_inclusive(values.len() - 1)]
        }
    }
}

/// Gain that brings noise of `noise_power` to `snr_db` below `signal_power`
///
/// Returns `None` when either power is zero, in which case no noise is mixed.
pub fn snr_gain(signal_power: f64, noise_power: f64, snr_db: f64) -> Option<f64> {
    if signal_power == 0.0 || noise_power == 0.0 {
        return None;
    }
    let target_noise_power = signal_power / db_to_power(snr_db);
    Some((target_noise_power / noise_power).sqrt())
}

/// SNR in dB between a signal and a noise segment scaled by `gain`
pub fn achieved_snr_db(signal_power: f64, noise_power: f64, gain: f64) -> f64 {
    power_to_db(signal_power / (noise_power * gain * gain))
}

/// Result of mixing one noise segment into a signal
#[derive(Debug, Clone)]
pub struct MixOutcome {
    /// Mixed samples (or an unchanged copy of the signal)
    pub samples: Vec<f32>,
    /// Gain applied to the noise segment, `None` if mixing was skipped
    pub gain: Option<f64>,
    /// Peak divided out to prevent clipping, if any
    pub rescaled_by: Option<f32>,
}

/// Mix `segment` into `signal` at `snr_db`
///
/// `segment` must be at least as long as `signal`; extra samples are ignored.
pub fn mix_at_snr(signal: &[f32], segment: &[f32], snr_db: f32) -> MixOutcome {
    let signal_power = mean_power(signal);
    let noise_power = mean_power(&segment[..signal.len().min(segment.len())]);

    let gain = match snr_gain(signal_power, noise_power, snr_db as f64) {
        Some(gain) => gain,
        None => {
            log::debug!(
                "Skipping noise mix: signal_power={:.3e}, noise_power={:.3e}",
                signal_power,
                noise_power
            );
            return MixOutcome {
                samples: signal.to_vec(),
                gain: None,
                rescaled_by: None,
            };
        }
    };

    let mut mixed: Vec<f32> = signal
        .iter()
        .zip(segment)
        .map(|(&s, &n)| (s as f64 + n as f64 * gain) as f32)
        .collect();

    let rescaled_by = rescale_if_clipping(&mut mixed);
    if let Some(peak) = rescaled_by {
        log::debug!("Mixed peak {:.3} exceeded full scale, rescaled", peak);
    }

    log::debug!(
        "Mixed noise at {:.2} dB SNR (achieved {:.2} dB, gain={:.4}, signal rms={:.4}, mixed rms={:.4})",
        snr_db,
        achieved_snr_db(signal_power, noise_power, gain),
        gain,
        rms(signal),
        rms(&mixed)
    );

    MixOutcome {
        samples: mixed,
        gain: Some(gain),
        rescaled_by,
    }
}

/// A noise-mixed copy of a signal and the SNR it was mixed at
#[derive(Debug, Clone, PartialEq)]
pub struct NoisyBuffer {
    /// Mixed audio
    pub buffer: AudioBuffer,
    /// Target SNR drawn for this copy, in dB
    pub snr_db: f32,
}

/// Mix a random window of `library` into `signal` at a random SNR, keeping
/// the drawn SNR
///
/// Works on a copy; `signal` and `library` are left untouched.
pub fn mix_noise_tagged<R: RandomSource + ?Sized>(
    signal: &AudioBuffer,
    library: &NoiseLibrary,
    snr: &SnrDistribution,
    rng: &mut R,
) -> NoisyBuffer {
    if signal.is_empty() {
        return NoisyBuffer {
            buffer: signal.clone(),
            snr_db: draw_snr(snr, rng),
        };
    }
    let segment = library.random_segment(signal.len(), rng);
    let snr_db = draw_snr(snr, rng);
    let outcome = mix_at_snr(signal.samples(), &segment, snr_db);
    NoisyBuffer {
        buffer: AudioBuffer::new(outcome.samples, signal.sample_rate()),
        snr_db,
    }
}

/// Mix a random window of `library` into `signal` at a random SNR
pub fn mix_noise<R: RandomSource + ?Sized>(
    signal: &AudioBuffer,
    library: &NoiseLibrary,
    snr: &SnrDistribution,
    rng: &mut R,
) -> AudioBuffer {
    mix_noise_tagged(signal, library, snr, rng).buffer
}
