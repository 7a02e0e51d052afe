//! Session configuration.

use wanderlore_core::error::DomainError;
use wanderlore_discovery::domain::config::DiscoveryConfig;
use wanderlore_geo::GeoPosition;
use wanderlore_narrative::domain::config::NarrativeConfig;
use wanderlore_progression::domain::curve::LevelCurve;
use wanderlore_world_state::domain::aggregates::DEFAULT_WEATHER_REFRESH_MS;

use super::state::Difficulty;

/// XP granted for narrative progress.
#[derive(Debug, Clone, PartialEq)]
pub struct XpAwards {
    /// First visit to a story location.
    pub story_visited: f64,
    /// Collecting a secret location.
    pub secret_found: f64,
    /// Resolving a story choice.
    pub choice_resolved: f64,
    /// Moving on to the next stage.
    pub stage_advanced: f64,
}

impl Default for XpAwards {
    fn default() -> Self {
        Self {
            story_visited: 50.0,
            secret_found: 100.0,
            choice_resolved: 25.0,
            stage_advanced: 200.0,
        }
    }
}

/// Everything needed to assemble and drive a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval between engine ticks.
    pub tick_interval_ms: u64,
    /// Interval between unconditional saves.
    pub autosave_interval_ms: u64,
    /// Interval between weather refreshes.
    pub weather_refresh_ms: u64,
    /// Substituted when no position fix is available.
    pub fallback_position: GeoPosition,
    /// Difficulty of a fresh playthrough.
    pub difficulty: Difficulty,
    /// Seed for the spawn RNG; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Choice costs and hint radius.
    pub narrative: NarrativeConfig,
    /// Spawn ring, caps and respawn timing.
    pub discovery: DiscoveryConfig,
    /// XP needed per consciousness level.
    pub level_curve: LevelCurve,
    /// XP granted for narrative progress.
    pub xp_awards: XpAwards,
}

impl Default for SessionConfig {
    #[allow(clippy::cast_sign_loss)]
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            autosave_interval_ms: 30_000,
            weather_refresh_ms: DEFAULT_WEATHER_REFRESH_MS as u64,
            fallback_position: GeoPosition::new(61.4978, 23.7610),
            difficulty: Difficulty::default(),
            rng_seed: None,
            narrative: NarrativeConfig::default(),
            discovery: DiscoveryConfig::default(),
            level_curve: LevelCurve::default(),
            xp_awards: XpAwards::default(),
        }
    }
}

impl SessionConfig {
    /// Validates this config and every engine config it carries.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a zero interval, an invalid
    /// fallback coordinate or an invalid engine config.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tick_interval_ms == 0 || self.autosave_interval_ms == 0 || self.weather_refresh_ms == 0 {
            return Err(DomainError::Validation(
                "session intervals must be positive".to_owned(),
            ));
        }
        if !self.fallback_position.is_valid() {
            return Err(DomainError::Validation(
                "fallback position is not a valid coordinate".to_owned(),
            ));
        }
        self.narrative.validate()?;
        self.discovery.validate()?;
        self.level_curve.validate()
    }
}
