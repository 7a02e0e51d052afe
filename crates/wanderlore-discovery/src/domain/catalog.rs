//! Discovery types and the weighted rarity draw.

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;
use wanderlore_core::rng::DeterministicRng;

/// Rarity tier of a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Half of all draws.
    Common,
    /// Regular but noticeably scarcer.
    Uncommon,
    /// Worth a detour.
    Rare,
    /// Seldom seen.
    Epic,
    /// Unlocks `legendary_find`.
    Legendary,
}

/// A kind of collectible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryType {
    /// Display name.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// XP awarded on collection.
    pub xp_value: f64,
    /// Relative draw weight.
    pub weight: f64,
}

/// The ordered set of discovery types.
///
/// Declaration order matters: the draw subtracts weights in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryCatalog {
    types: Vec<DiscoveryType>,
    total_weight: f64,
}

impl DiscoveryCatalog {
    /// Builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the catalog is empty or a weight
    /// or XP value is negative or non-finite, or all weights are zero.
    pub fn new(types: Vec<DiscoveryType>) -> Result<Self, DomainError> {
        if types.is_empty() {
            return Err(DomainError::Validation(
                "discovery catalog must not be empty".to_owned(),
            ));
        }
        for discovery_type in &types {
            if !discovery_type.weight.is_finite() || discovery_type.weight < 0.0 {
                return Err(DomainError::Validation(format!(
                    "discovery type {} has an invalid weight",
                    discovery_type.name
                )));
            }
            if !discovery_type.xp_value.is_finite() || discovery_type.xp_value < 0.0 {
                return Err(DomainError::Validation(format!(
                    "discovery type {} has an invalid xp value",
                    discovery_type.name
                )));
            }
        }
        let total_weight: f64 = types.iter().map(|t| t.weight).sum();
        if total_weight <= 0.0 {
            return Err(DomainError::Validation(
                "discovery weights must not all be zero".to_owned(),
            ));
        }
        Ok(Self { types, total_weight })
    }

    /// Types in draw order.
    #[must_use]
    pub fn types(&self) -> &[DiscoveryType] {
        &self.types
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Draws a uniform value in `[0, total)` and subtracts weights in
    /// declaration order until it is no longer positive.
    pub fn draw(&self, rng: &mut dyn DeterministicRng) -> &DiscoveryType {
        let mut remaining = rng.next_f64() * self.total_weight;
        for discovery_type in &self.types {
            remaining -= discovery_type.weight;
            if remaining <= 0.0 {
                return discovery_type;
            }
        }
        // Float rounding can leave a sliver above zero.
        &self.types[self.types.len() - 1]
    }
}

impl Default for DiscoveryCatalog {
    fn default() -> Self {
        let entry = |name: &str, rarity, xp_value, weight| DiscoveryType {
            name: name.to_owned(),
            rarity,
            xp_value,
            weight,
        };
        let types = vec![
            entry("Echo Fragment", Rarity::Common, 10.0, 50.0),
            entry("Whispering Stone", Rarity::Uncommon, 25.0, 30.0),
            entry("Veil Shard", Rarity::Rare, 50.0, 15.0),
            entry("Dream Relic", Rarity::Epic, 100.0, 4.0),
            entry("Primordial Memory", Rarity::Legendary, 250.0, 1.0),
        ];
        Self {
            total_weight: types.iter().map(|t| t.weight).sum(),
            types,
        }
    }
}
