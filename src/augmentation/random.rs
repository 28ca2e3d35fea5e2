//! Injectable randomness
//!
//! Every random draw in the augmentation engine (noise window offset, SNR,
//! volume factor, shift amount) goes through [`RandomSource`], so tests can
//! script exact sequences and batch runs can seed one generator per input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws used by the augmentation transforms
pub trait RandomSource {
    /// Uniform value in `[low, high]`; returns `low` when the range is empty
    /// or unbounded
    fn uniform(&mut self, low: f32, high: f32) -> f32;

    /// Uniform integer in `[0, upper]`
    fn index_inclusive(&mut self, upper: usize) -> usize;
}

/// Seedable generator backed by [`StdRng`]
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Generator with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator for the `index`-th unit of a batch seeded with `seed`
    ///
    /// Each input gets its own stream, so the output of a batch does not depend
    /// on how many workers processed it or in which order.
    pub fn for_unit(seed: u64, index: u64) -> Self {
        Self::new(seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if !(high > low) || !low.is_finite() || !high.is_finite() {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn index_inclusive(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }
}

/// Replays fixed draws in order; used by unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedRandom {
    pub uniforms: std::collections::VecDeque<f32>,
    pub indices: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(uniforms: &[f32], indices: &[usize]) -> Self {
        Self {
            uniforms: uniforms.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        let value = self.uniforms.pop_front().unwrap_or(low);
        value.clamp(low, high.max(low))
    }

    fn index_inclusive(&mut self, upper: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(upper)
    }
}
