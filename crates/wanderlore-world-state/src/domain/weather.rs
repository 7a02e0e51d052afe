//! Weather-derived gameplay modifiers and their source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;

/// Multipliers produced by the weather collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherModifiers {
    /// Multiplier on sanity costs.
    pub sanity_modifier: f64,
    /// Multiplier on every choice cost.
    pub difficulty_modifier: f64,
    /// How far the player can see, as a multiplier on hint radii.
    pub visibility_range: f64,
    /// Flavor line appended to narrative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_modifier: Option<String>,
    /// Multiplier on ambient audio intensity.
    pub audio_modifier: f64,
}

impl WeatherModifiers {
    /// Modifiers that leave every cost unchanged.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            sanity_modifier: 1.0,
            difficulty_modifier: 1.0,
            visibility_range: 1.0,
            narrative_modifier: None,
            audio_modifier: 1.0,
        }
    }

    /// Replaces any negative or non-finite multiplier with its neutral value.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn clean(value: f64) -> f64 {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                1.0
            }
        }
        Self {
            sanity_modifier: clean(self.sanity_modifier),
            difficulty_modifier: clean(self.difficulty_modifier),
            visibility_range: clean(self.visibility_range),
            narrative_modifier: self.narrative_modifier.filter(|s| !s.trim().is_empty()),
            audio_modifier: clean(self.audio_modifier),
        }
    }
}

impl Default for WeatherModifiers {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Periodic provider of weather modifiers.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches current modifiers.
    async fn fetch_modifiers(&self) -> Result<WeatherModifiers, DomainError>;
}

/// Weather source that always reports the same modifiers.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherSource {
    modifiers: WeatherModifiers,
}

impl StaticWeatherSource {
    /// Wraps fixed modifiers.
    #[must_use]
    pub fn new(modifiers: WeatherModifiers) -> Self {
        Self { modifiers }
    }
}

#[async_trait]
impl WeatherSource for StaticWeatherSource {
    async fn fetch_modifiers(&self) -> Result<WeatherModifiers, DomainError> {
        Ok(self.modifiers.clone())
    }
}
