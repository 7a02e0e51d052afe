//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use wanderlore_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Suitable for tests that do not depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that returns values from predetermined sequences. Panics if a
/// sequence is exhausted. Used in tests that need specific, repeatable
/// random outcomes (e.g., spawn angles and rarity draws).
#[derive(Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    floats: Vec<f64>,
    float_index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given integer values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Create a new `SequenceRng` with the given `[0, 1)` float values.
    #[must_use]
    pub fn with_floats(floats: Vec<f64>) -> Self {
        Self {
            floats,
            ..Self::default()
        }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        let val = self.floats[self.float_index];
        self.float_index += 1;
        val
    }
}
