//! Tunables for the discovery engine.

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;

/// Discovery engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Outer radius of the spawn ring around the player.
    pub spawn_radius_meters: f64,
    /// Inner radius of the spawn ring.
    pub min_spawn_distance_meters: f64,
    /// Distance at which a discovery is collected automatically.
    pub collection_radius_meters: f64,
    /// Cap on live discoveries.
    pub max_discoveries: usize,
    /// Spawned at the first position and on reshuffle.
    pub initial_batch: usize,
    /// Age in milliseconds after which an uncollected discovery expires.
    pub respawn_time_ms: i64,
    /// Delay in milliseconds before a replacement spawns.
    pub respawn_delay_ms: i64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            spawn_radius_meters: 200.0,
            min_spawn_distance_meters: 20.0,
            collection_radius_meters: 5.0,
            max_discoveries: 10,
            initial_batch: 6,
            respawn_time_ms: 300_000,
            respawn_delay_ms: 2_000,
        }
    }
}

impl DiscoveryConfig {
    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a distance is negative, the
    /// collection radius or minimum distance exceeds the spawn radius, the
    /// initial batch exceeds the cap, or a duration is not positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        let distances = [
            self.spawn_radius_meters,
            self.min_spawn_distance_meters,
            self.collection_radius_meters,
        ];
        if distances.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(DomainError::Validation(
                "discovery distances must be non-negative".to_owned(),
            ));
        }
        if self.collection_radius_meters > self.spawn_radius_meters {
            return Err(DomainError::Validation(
                "collection radius must not exceed the spawn radius".to_owned(),
            ));
        }
        if self.min_spawn_distance_meters > self.spawn_radius_meters {
            return Err(DomainError::Validation(
                "minimum spawn distance must not exceed the spawn radius".to_owned(),
            ));
        }
        if self.initial_batch > self.max_discoveries {
            return Err(DomainError::Validation(
                "initial batch must not exceed max discoveries".to_owned(),
            ));
        }
        if self.respawn_time_ms <= 0 || self.respawn_delay_ms < 0 {
            return Err(DomainError::Validation(
                "respawn time must be positive and respawn delay non-negative".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DiscoveryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_collection_radius_above_spawn_radius_is_rejected() {
        let config = DiscoveryConfig {
            collection_radius_meters: 250.0,
            ..DiscoveryConfig::default()
        };

        assert!(matches!(config.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_initial_batch_above_cap_is_rejected() {
        let config = DiscoveryConfig {
            initial_batch: 11,
            ..DiscoveryConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
