//! Injectable randomness
//!
//! Every probabilistic decision in the crate draws from a [`RandomSource`],
//! so tests can replay exact sequences and production code can use a seeded
//! ChaCha generator.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw in `[0, upper)`
    fn uniform(&mut self, upper: f64) -> f64 {
        self.next_f64() * upper
    }

    /// Uniform index into a collection of `len` items; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on an empty collection");
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

// ==================== ChaCha ====================

/// Seeded ChaCha8 generator
#[derive(Clone, Debug)]
pub struct ChaChaRandom {
    rng: ChaCha8Rng,
}

impl ChaChaRandom {
    /// Create a generator with a specific seed (for testing and replays)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from the system clock
    pub fn from_time() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(seed)
    }
}

impl Default for ChaChaRandom {
    fn default() -> Self {
        Self::from_time()
    }
}

impl RandomSource for ChaChaRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen()
    }
}

// ==================== Scripted ====================

/// Replays a fixed list of draws, cycling when it runs out
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
            consumed: 0,
        }
    }

    /// Number of draws taken so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        match self.values.pop_front() {
            Some(v) => {
                self.values.push_back(v);
                v
            }
            None => 0.0,
        }
    }
}
