//! Tunables for the narrative engine.

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;

/// Narrative engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Secrets only produce a proximity hint inside this radius.
    pub hint_reveal_radius_meters: f64,
    /// Multiplier applied to every choice cost before weather modifiers.
    pub cost_multiplier: f64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            hint_reveal_radius_meters: 150.0,
            cost_multiplier: 1.0,
        }
    }
}

impl NarrativeConfig {
    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative or non-finite value.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.hint_reveal_radius_meters.is_finite() || self.hint_reveal_radius_meters < 0.0 {
            return Err(DomainError::Validation(
                "hint reveal radius must be a non-negative number".to_owned(),
            ));
        }
        if !self.cost_multiplier.is_finite() || self.cost_multiplier < 0.0 {
            return Err(DomainError::Validation(
                "cost multiplier must be a non-negative number".to_owned(),
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
        assert!(NarrativeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_hint_radius_is_rejected() {
        let config = NarrativeConfig {
            hint_reveal_radius_meters: -1.0,
            ..NarrativeConfig::default()
        };

        assert!(matches!(config.validate(), Err(DomainError::Validation(_))));
    }
}
