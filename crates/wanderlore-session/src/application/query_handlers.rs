//! The read model published to clients after every session step.

use std::collections::BTreeSet;

use serde::Serialize;
use wanderlore_discovery::application::query_handlers::{DiscoveryView, discovery_view};
use wanderlore_geo::GeoPosition;
use wanderlore_narrative::application::query_handlers::{NarrativeView, narrative_view};
use wanderlore_progression::domain::aggregates::ConsciousnessLedger;
use wanderlore_progression::domain::curve::ConsciousnessTier;
use wanderlore_world_state::domain::weather::WeatherModifiers;

use crate::domain::aggregates::GameSession;
use crate::domain::state::Difficulty;

/// Level and XP as the client shows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsciousnessView {
    /// Consciousness level, starting at 1.
    pub level: u32,
    /// XP earned inside the current level.
    pub current_xp: f64,
    /// XP earned over the playthrough.
    pub total_xp: f64,
    /// XP the current level requires.
    pub xp_for_next_level: f64,
    /// Named band for the level.
    pub tier: ConsciousnessTier,
    /// Unlocked achievement ids.
    pub achievements: BTreeSet<String>,
    /// Unlocked lore ids.
    pub lore_unlocked: BTreeSet<String>,
}

/// Builds the view from the ledger.
#[must_use]
pub fn consciousness_view(ledger: &ConsciousnessLedger) -> ConsciousnessView {
    let state = ledger.state();
    ConsciousnessView {
        level: ledger.level(),
        current_xp: state.current_xp,
        total_xp: state.total_xp,
        xp_for_next_level: ledger.xp_for_next_level(),
        tier: ledger.tier().clone(),
        achievements: state.achievements.clone(),
        lore_unlocked: state.lore_unlocked.clone(),
    }
}

/// Everything a client renders, as of one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Whether evaluation is frozen.
    pub paused: bool,
    /// Last accepted position.
    pub position: Option<GeoPosition>,
    /// Whether that position is the configured fallback.
    pub using_fallback: bool,
    /// Difficulty of this playthrough.
    pub difficulty: Difficulty,
    /// Story side.
    pub narrative: NarrativeView,
    /// Discovery side.
    pub discovery: DiscoveryView,
    /// XP and unlocks.
    pub consciousness: ConsciousnessView,
    /// Modifiers in effect.
    pub weather: WeatherModifiers,
}

/// Captures the current state of `session`.
#[must_use]
pub fn session_snapshot(session: &GameSession) -> SessionSnapshot {
    let position = session.position();
    let weather = session.weather().modifiers();
    SessionSnapshot {
        paused: session.is_paused(),
        position,
        using_fallback: session.is_using_fallback(),
        difficulty: session.difficulty(),
        narrative: narrative_view(session.narrative(), position.as_ref(), weather),
        discovery: discovery_view(session.discovery()),
        consciousness: consciousness_view(session.ledger()),
        weather: weather.clone(),
    }
}
