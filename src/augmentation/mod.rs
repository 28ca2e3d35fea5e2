//! Data augmentation
//!
//! Turns one standardized capture into a labeled family of training units:
//! - The clean copy
//! - Noise-mixed variants at random SNRs
//! - Volume-perturbed variants
//! - Time-shifted variants
//!
//! Every transform reads the shared source by reference and returns a new
//! buffer, so no variant can observe another variant's changes.

pub mod naming;
pub mod negative;
pub mod noise;
pub mod random;
pub mod shift;
pub mod volume;

use crate::config::AugmentationSpec;
use crate::io::sample_buffer::AudioBuffer;

use self::naming::{unit_stem, AugmentationKind};
use self::noise::{mix_noise, NoiseLibrary};
use self::random::RandomSource;
use self::shift::apply_time_shift;
use self::volume::apply_volume;

/// One generated unit
#[derive(Debug, Clone)]
pub struct AugmentedVariant {
    /// Transform that produced the unit
    pub kind: AugmentationKind,
    /// 1-based index within its kind, `None` for the clean copy
    pub index: Option<usize>,
    /// Generated audio
    pub buffer: AudioBuffer,
}

impl AugmentedVariant {
    /// File stem for this unit derived from the source's base name
    pub fn stem(&self, base_name: &str) -> String {
        unit_stem(base_name, self.kind, self.index)
    }
}

/// Applies an [`AugmentationSpec`] with a shared [`NoiseLibrary`]
#[derive(Debug, Clone, Copy)]
pub struct AugmentationEngine<'a> {
    spec: &'a AugmentationSpec,
    library: &'a NoiseLibrary,
}

impl<'a> AugmentationEngine<'a> {
    /// Create an engine borrowing its parameters and noise source
    pub fn new(spec: &'a AugmentationSpec, library: &'a NoiseLibrary) -> Self {
        Self { spec, library }
    }

    /// Generate every unit for one standardized source, clean copy first
    ///
    /// Units are ordered clean, noise 1..n, volume 1..n, shift 1..n, and the
    /// random draws are consumed in that same order.
    pub fn augment<R: RandomSource + ?Sized>(
        &self,
        source: &AudioBuffer,
        rng: &mut R,
    ) -> Vec<AugmentedVariant> {
        let spec = self.spec;
        let mut variants = Vec::with_capacity(spec.units_per_source());

        variants.push(AugmentedVariant {
            kind: AugmentationKind::Clean,
            index: None,
            buffer: source.clone(),
        });

        for i in 1..=spec.noise_variants {
            variants.push(AugmentedVariant {
                kind: AugmentationKind::Noise,
                index: Some(i),
                buffer: mix_noise(source, self.library, &spec.snr, rng),
            });
        }

        for i in 1..=spec.volume_variants {
            variants.push(AugmentedVariant {
                kind: AugmentationKind::Volume,
                index: Some(i),
                buffer: apply_volume(source, spec.volume_range, rng),
            });
        }

        for i in 1..=spec.shift_variants {
            variants.push(AugmentedVariant {
                kind: AugmentationKind::Shift,
                index: Some(i),
                buffer: apply_time_shift(source, spec.shift_range_secs, rng),
            });
        }

        log::debug!("Generated {} units from {} samples", variants.len(), source.len());
        variants
    }
}
