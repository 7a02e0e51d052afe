//! What the client should be showing.

use serde::{Deserialize, Serialize};

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    /// Health reached zero.
    HealthDepleted,
    /// Sanity reached zero.
    SanityDepleted,
}

/// Global screen mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "detail", rename_all = "snake_case")]
pub enum ScreenMode {
    /// Free roaming on the map.
    #[default]
    Map,
    /// The one-time character introduction.
    CharacterIntro,
    /// A cutscene with its renderer payload.
    Cutscene(serde_json::Value),
    /// Terminal.
    GameOver(GameOverCause),
}

impl ScreenMode {
    /// Whether this is the terminal mode.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_mode_serializes_adjacently_tagged() {
        let json = serde_json::to_value(ScreenMode::GameOver(GameOverCause::SanityDepleted)).unwrap();

        assert_eq!(json["mode"], "game_over");
        assert_eq!(json["detail"], "sanity_depleted");
        assert_eq!(serde_json::to_value(ScreenMode::Map).unwrap()["mode"], "map");
    }
}
