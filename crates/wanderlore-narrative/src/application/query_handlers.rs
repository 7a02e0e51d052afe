//! Read-side views of the narrative engine.

use serde::Serialize;
use wanderlore_content::domain::location::StageId;
use wanderlore_geo::GeoPosition;
use wanderlore_world_state::domain::weather::WeatherModifiers;

use crate::domain::aggregates::{NarrativeEngine, Presentation, ProximityHint};
use crate::domain::screen::ScreenMode;

/// What the client renders for the narrative side of the game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeView {
    /// Current story stage.
    pub stage: StageId,
    /// Health, 0 to 100.
    pub health: u8,
    /// Sanity, 0 to 100.
    pub sanity: u8,
    /// Which screen the client should show.
    pub screen: ScreenMode,
    /// Text of the presentation on screen.
    pub narrative_text: Option<String>,
    /// The presentation on screen, if any.
    pub active_presentation: Option<Presentation>,
    /// Presentations queued behind it.
    pub pending_presentations: usize,
    /// Collected item ids in pickup order.
    pub inventory_items: Vec<String>,
    /// Distance and direction to the nearest unvisited location.
    pub hint: Option<ProximityHint>,
}

/// Builds the view; the hint is only computed once a position is known.
#[must_use]
pub fn narrative_view(
    engine: &NarrativeEngine,
    position: Option<&GeoPosition>,
    weather: &WeatherModifiers,
) -> NarrativeView {
    let progress = engine.progress();
    NarrativeView {
        stage: progress.stage,
        health: progress.health,
        sanity: progress.sanity,
        screen: engine.screen().clone(),
        narrative_text: engine.narrative_text().map(str::to_owned),
        active_presentation: engine.active_presentation().cloned(),
        pending_presentations: engine.pending_presentations(),
        inventory_items: progress.inventory_items.clone(),
        hint: position.and_then(|p| engine.nearest_hint(p, weather)),
    }
}
