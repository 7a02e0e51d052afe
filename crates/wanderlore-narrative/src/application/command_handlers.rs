//! Command handlers for the Narrative Proximity context.

use tracing::info;
use wanderlore_core::clock::Clock;
use wanderlore_core::command::Command;
use wanderlore_world_state::domain::weather::WeatherModifiers;

use crate::domain::aggregates::NarrativeEngine;
use crate::domain::commands::MakeChoice;

/// Handles the `MakeChoice` command against the live engine.
///
/// Returns whether the choice was applied. Rejected choices leave the
/// engine untouched.
pub fn handle_make_choice(
    command: &MakeChoice,
    engine: &mut NarrativeEngine,
    weather: &WeatherModifiers,
    clock: &dyn Clock,
) -> bool {
    let applied = engine.make_choice(&command.choice_id, weather, clock);
    info!(
        engine = command.engine(),
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        choice_id = %command.choice_id,
        applied,
        "choice handled"
    );
    applied
}
