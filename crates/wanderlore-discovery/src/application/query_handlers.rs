//! Read-side views of the discovery engine.

use serde::Serialize;

use crate::domain::aggregates::{Discovery, DiscoveryEngine, NearbyDiscovery};

/// What the client renders for the discovery layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryView {
    /// Uncollected discoveries in spawn order.
    pub live: Vec<Discovery>,
    /// The closest few, nearest first.
    pub nearby: Vec<NearbyDiscovery>,
    /// Replacements waiting for their delay.
    pub pending_respawns: usize,
    /// Collected since the session started.
    pub collected_total: u32,
}

/// Builds the view from the engine's current state.
#[must_use]
pub fn discovery_view(engine: &DiscoveryEngine) -> DiscoveryView {
    DiscoveryView {
        live: engine.live().to_vec(),
        nearby: engine.nearby().to_vec(),
        pending_respawns: engine.pending_respawns(),
        collected_total: engine.collected_total(),
    }
}
