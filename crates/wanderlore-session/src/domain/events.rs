//! The session-wide event type published on the event bus.

use serde_json::json;
use wanderlore_core::event::DomainEvent;
use wanderlore_discovery::domain::events::DiscoveryEvent;
use wanderlore_geo::PositionAdvisory;
use wanderlore_narrative::domain::events::NarrativeEvent;
use wanderlore_progression::domain::events::ProgressionEvent;
use wanderlore_world_state::domain::events::WorldStateEvent;

/// Event type identifier for [`GameEvent::PositionAdvisory`].
pub const POSITION_ADVISORY_EVENT_TYPE: &str = "session.position_advisory";

/// Any event produced while handling one command or tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// From the narrative engine.
    Narrative(NarrativeEvent),
    /// From the discovery engine.
    Discovery(DiscoveryEvent),
    /// From the consciousness ledger.
    Progression(ProgressionEvent),
    /// From the weather cache.
    WorldState(WorldStateEvent),
    /// The player should be told their position is approximate.
    PositionAdvisory(PositionAdvisory),
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Narrative(e) => e.event_type(),
            Self::Discovery(e) => e.event_type(),
            Self::Progression(e) => e.event_type(),
            Self::WorldState(e) => e.event_type(),
            Self::PositionAdvisory(_) => POSITION_ADVISORY_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        match self {
            Self::Narrative(e) => e.to_payload(),
            Self::Discovery(e) => e.to_payload(),
            Self::Progression(e) => e.to_payload(),
            Self::WorldState(e) => e.to_payload(),
            Self::PositionAdvisory(advisory) => json!({
                "reason": advisory.reason,
                "fallback": advisory.fallback,
            }),
        }
    }
}
