//! Uniform random sources
//!
//! The simulator only ever needs "next uniform float in [0, 1)", so every
//! source of randomness is reduced to that one call. Production runs use a
//! seeded `StdRng`; tests replay a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A stream of uniform samples in `[0, 1)`
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

/// `StdRng`-backed source that remembers its seed so a run can be replayed
pub struct SeededSource {
    seed: u64,
    rng: StdRng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        SeededSource {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh seed from OS entropy
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().next_u64();
        Self::from_seed(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for SeededSource {
    fn next_uniform(&mut self) -> f64 {
        // Standard distribution for f64 is half-open [0, 1)
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of samples, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    /// Samples outside `[0, 1)` are clamped into range
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() {
            vec![0.0]
        } else {
            values
                .into_iter()
                .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, LARGEST_BELOW_ONE) })
                .collect()
        };
        SequenceSource { values, position: 0 }
    }

    /// Number of samples handed out so far
    pub fn draws(&self) -> usize {
        self.position
    }
}

const LARGEST_BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

impl UniformSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
