//! Domain events for the Procedural Discovery context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wanderlore_core::event::DomainEvent;
use wanderlore_geo::GeoPosition;

use super::catalog::Rarity;

/// Event type identifier for [`DiscoveryEventKind::DiscoverySpawned`].
pub const DISCOVERY_SPAWNED_EVENT_TYPE: &str = "discovery.spawned";

/// Event type identifier for [`DiscoveryEventKind::DiscoveryCollected`].
pub const DISCOVERY_COLLECTED_EVENT_TYPE: &str = "discovery.collected";

/// Event type identifier for [`DiscoveryEventKind::DiscoveryExpired`].
pub const DISCOVERY_EXPIRED_EVENT_TYPE: &str = "discovery.expired";

/// Event type identifier for [`DiscoveryEventKind::DiscoveriesReshuffled`].
pub const DISCOVERIES_RESHUFFLED_EVENT_TYPE: &str = "discovery.reshuffled";

/// Event payload variants for the Procedural Discovery context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscoveryEventKind {
    /// A discovery was placed on the map.
    DiscoverySpawned {
        discovery_id: Uuid,
        type_name: String,
        rarity: Rarity,
        position: GeoPosition,
    },
    /// The player walked onto a discovery.
    DiscoveryCollected {
        discovery_id: Uuid,
        type_name: String,
        rarity: Rarity,
        xp_value: f64,
    },
    /// A discovery aged out uncollected.
    DiscoveryExpired { discovery_id: Uuid },
    /// Every live discovery was discarded for a fresh batch.
    DiscoveriesReshuffled { discarded: usize, spawned: usize },
}

/// Domain event envelope for the Procedural Discovery context.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryEvent {
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub kind: DiscoveryEventKind,
}

impl DomainEvent for DiscoveryEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            DiscoveryEventKind::DiscoverySpawned { .. } => DISCOVERY_SPAWNED_EVENT_TYPE,
            DiscoveryEventKind::DiscoveryCollected { .. } => DISCOVERY_COLLECTED_EVENT_TYPE,
            DiscoveryEventKind::DiscoveryExpired { .. } => DISCOVERY_EXPIRED_EVENT_TYPE,
            DiscoveryEventKind::DiscoveriesReshuffled { .. } => DISCOVERIES_RESHUFFLED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("DiscoveryEventKind serialization is infallible")
    }
}
