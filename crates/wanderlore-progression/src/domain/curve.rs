//! Level thresholds and named consciousness stages.

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;

/// A named consciousness stage reached at `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsciousnessTier {
    /// Minimum level for this stage.
    pub level: u32,
    /// Display name.
    pub name: String,
    /// Display color as a hex string.
    pub color: String,
}

impl ConsciousnessTier {
    fn new(level: u32, name: &str, color: &str) -> Self {
        Self {
            level,
            name: name.to_owned(),
            color: color.to_owned(),
        }
    }
}

/// XP curve: `threshold(level) = floor(base_xp * level^(curve - 1))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// XP needed to leave level 1.
    pub base_xp: f64,
    /// Growth exponent; thresholds increase with level when above 1.
    pub curve: f64,
    /// Stage breakpoints in ascending level order.
    pub tiers: Vec<ConsciousnessTier>,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_xp: 100.0,
            curve: 1.5,
            tiers: vec![
                ConsciousnessTier::new(1, "Dormant", "#6b7280"),
                ConsciousnessTier::new(3, "Stirring", "#60a5fa"),
                ConsciousnessTier::new(5, "Awakened", "#34d399"),
                ConsciousnessTier::new(10, "Lucid", "#fbbf24"),
                ConsciousnessTier::new(15, "Transcendent", "#f472b6"),
                ConsciousnessTier::new(20, "Omniscient", "#a78bfa"),
            ],
        }
    }
}

impl LevelCurve {
    /// Checks the curve invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `base_xp < 1`, `curve < 1`, or
    /// the tiers are empty, unsorted, or do not cover level 1.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.base_xp.is_finite() || self.base_xp < 1.0 {
            return Err(DomainError::Validation(
                "base XP must be at least 1".to_owned(),
            ));
        }
        if !self.curve.is_finite() || self.curve < 1.0 {
            return Err(DomainError::Validation(
                "level curve exponent must be at least 1".to_owned(),
            ));
        }
        match self.tiers.first() {
            Some(first) if first.level <= 1 => {}
            _ => {
                return Err(DomainError::Validation(
                    "consciousness tiers must start at level 1".to_owned(),
                ));
            }
        }
        if self.tiers.windows(2).any(|pair| pair[0].level >= pair[1].level) {
            return Err(DomainError::Validation(
                "consciousness tiers must be in strictly ascending level order".to_owned(),
            ));
        }
        Ok(())
    }

    /// XP required to advance from `level` to `level + 1`.
    #[must_use]
    pub fn threshold(&self, level: u32) -> f64 {
        (self.base_xp * f64::from(level).powf(self.curve - 1.0)).floor()
    }

    /// The stage in effect at `level`: the last breakpoint at or below it.
    ///
    /// # Panics
    ///
    /// Panics if the curve has no tiers; `validate` rejects such curves.
    #[must_use]
    pub fn tier_for(&self, level: u32) -> &ConsciousnessTier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.level <= level)
            .unwrap_or(&self.tiers[0])
    }
}
