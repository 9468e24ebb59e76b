//! Random number sources for rotation draws.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Supplies a fresh generator for each selection run.
pub trait RotationRandomness: Send + Sync {
    /// Return a generator to drive one draw.
    fn rng(&self) -> StdRng;
}

/// Production source seeded from operating system entropy on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRandomness;

impl RotationRandomness for EntropyRandomness {
    fn rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}

/// Reproducible source for tests and local demos.
///
/// Each call derives a new generator from the base seed and a call counter,
/// so consecutive draws differ while the whole sequence stays repeatable.
///
/// # Examples
/// ```
/// use munch_backend::domain::{RotationRandomness, SeededRandomness};
/// use rand::Rng;
///
/// let first: u64 = SeededRandomness::new(5).rng().r#gen();
/// let again: u64 = SeededRandomness::new(5).rng().r#gen();
/// assert_eq!(first, again);
/// ```
#[derive(Debug)]
pub struct SeededRandomness {
    seed: u64,
    calls: Mutex<u64>,
}

impl SeededRandomness {
    /// Build a source rooted at `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            calls: Mutex::new(0),
        }
    }
}

impl RotationRandomness for SeededRandomness {
    fn rng(&self) -> StdRng {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let call = *calls;
        *calls = call.wrapping_add(1);
        drop(calls);
        StdRng::seed_from_u64(self.seed.wrapping_add(call))
    }
}
