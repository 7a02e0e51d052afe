//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests and replays,
//! a seeded or recorded implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Production RNG backed by `rand`'s `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// Creates an RNG with a fixed seed; identical seeds replay identically.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl DeterministicRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Generates an identifier from two RNG-produced `u32` halves so that ids
/// are reproducible under a seeded RNG.
pub fn next_uuid(rng: &mut dyn DeterministicRng) -> Uuid {
    let hi = u64::from(rng.next_u32_range(0, u32::MAX));
    let lo = u64::from(rng.next_u32_range(0, u32::MAX));
    let bits = (hi << 32) | lo;
    Uuid::from_u64_pair(bits, bits.wrapping_mul(0x517c_c1b7_2722_0a95))
}
