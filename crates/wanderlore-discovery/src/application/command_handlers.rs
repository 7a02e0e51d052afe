//! Command handlers for the Procedural Discovery context.

use tracing::info;
use wanderlore_core::clock::Clock;
use wanderlore_core::command::Command;
use wanderlore_core::rng::DeterministicRng;

use crate::domain::aggregates::DiscoveryEngine;
use crate::domain::commands::ReshuffleDiscoveries;

/// Handles the `ReshuffleDiscoveries` command. Returns the number of
/// discoveries in the fresh batch.
pub fn handle_reshuffle(
    command: &ReshuffleDiscoveries,
    engine: &mut DiscoveryEngine,
    clock: &dyn Clock,
    rng: &mut dyn DeterministicRng,
) -> usize {
    let spawned = engine.reshuffle(clock, rng);
    info!(
        engine = command.engine(),
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        spawned,
        "reshuffle handled"
    );
    spawned
}
