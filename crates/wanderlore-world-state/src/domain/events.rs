//! Domain events for the World State context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wanderlore_core::event::DomainEvent;

use super::weather::WeatherModifiers;

/// Event type identifier for [`WorldStateEventKind::WeatherUpdated`].
pub const WEATHER_UPDATED_EVENT_TYPE: &str = "world_state.weather_updated";

/// Event type identifier for [`WorldStateEventKind::WeatherDegraded`].
pub const WEATHER_DEGRADED_EVENT_TYPE: &str = "world_state.weather_degraded";

/// Event payload variants for the World State context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldStateEventKind {
    /// Fresh modifiers were received.
    WeatherUpdated {
        /// The new modifiers.
        modifiers: WeatherModifiers,
    },
    /// The fetch failed and modifiers reverted to neutral.
    WeatherDegraded {
        /// Why the fetch failed.
        reason: String,
    },
}

/// Domain event envelope for the World State context.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldStateEvent {
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub kind: WorldStateEventKind,
}

impl DomainEvent for WorldStateEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            WorldStateEventKind::WeatherUpdated { .. } => WEATHER_UPDATED_EVENT_TYPE,
            WorldStateEventKind::WeatherDegraded { .. } => WEATHER_DEGRADED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("WorldStateEventKind serialization is infallible")
    }
}
