//! The persisted player state.

use serde::{Deserialize, Serialize};
use wanderlore_narrative::domain::progress::NarrativeProgress;
use wanderlore_progression::domain::aggregates::ConsciousnessState;

/// Difficulty chosen for a playthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Choices cost three quarters.
    Easy,
    /// Choices cost their listed amount.
    #[default]
    Medium,
    /// Choices cost half again.
    Hard,
}

impl Difficulty {
    /// Multiplier applied to every choice cost.
    #[must_use]
    pub fn cost_multiplier(self) -> f64 {
        match self {
            Self::Easy => 0.75,
            Self::Medium => 1.0,
            Self::Hard => 1.5,
        }
    }

    /// The wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Everything a session persists, serialized as one flat camelCase object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgressState {
    /// Stage, vitals, inventory and visit sets.
    #[serde(flatten)]
    pub narrative: NarrativeProgress,
    /// Missing in older saves; defaults to medium.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// XP and unlocks.
    #[serde(flatten)]
    pub consciousness: ConsciousnessState,
}

impl PlayerProgressState {
    /// A fresh playthrough on `difficulty`.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_flat() {
        // Arrange
        let mut state = PlayerProgressState::new(Difficulty::Hard);
        state.narrative.inventory_items.push("rusted_compass".to_owned());
        state.consciousness.achievements.insert("first_secret".to_owned());

        // Act
        let json = serde_json::to_value(&state).unwrap();

        // Assert
        assert_eq!(json["health"], 100);
        assert_eq!(json["sanity"], 100);
        assert_eq!(json["stage"], "start");
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["consciousnessLevel"], 1);
        assert_eq!(json["inventoryItems"][0], "rusted_compass");
        assert_eq!(json["achievements"][0], "first_secret");
        let back: PlayerProgressState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
