//! Domain events for the Narrative Proximity context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wanderlore_content::domain::choices::Vital;
use wanderlore_content::domain::location::{LocationKind, StageId};
use wanderlore_core::event::DomainEvent;

use super::screen::GameOverCause;

/// Event type identifier for [`NarrativeEventKind::LocationTriggered`].
pub const LOCATION_TRIGGERED_EVENT_TYPE: &str = "narrative.location_triggered";

/// Event type identifier for [`NarrativeEventKind::SecretCollected`].
pub const SECRET_COLLECTED_EVENT_TYPE: &str = "narrative.secret_collected";

/// Event type identifier for [`NarrativeEventKind::ChoicesPresented`].
pub const CHOICES_PRESENTED_EVENT_TYPE: &str = "narrative.choices_presented";

/// Event type identifier for [`NarrativeEventKind::ChoiceResolved`].
pub const CHOICE_RESOLVED_EVENT_TYPE: &str = "narrative.choice_resolved";

/// Event type identifier for [`NarrativeEventKind::StageAdvanced`].
pub const STAGE_ADVANCED_EVENT_TYPE: &str = "narrative.stage_advanced";

/// Event type identifier for [`NarrativeEventKind::GameOver`].
pub const GAME_OVER_EVENT_TYPE: &str = "narrative.game_over";

/// A location whose geofence the player entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    /// The triggered location.
    pub location_id: String,
    /// Its kind.
    pub kind: LocationKind,
}

/// Event payload variants for the Narrative Proximity context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrativeEventKind {
    /// A geofence was entered.
    LocationTriggered(TriggerEvent),
    /// A secret was collected for the first time.
    SecretCollected {
        /// The secret location.
        location_id: String,
        /// Item added to the inventory, if the secret grants one.
        reward_item_id: Option<String>,
    },
    /// A presentation became the active one.
    ChoicesPresented {
        /// The location being presented.
        location_id: String,
        /// Offered choice ids; empty for informational presentations.
        choice_ids: Vec<String>,
    },
    /// The player resolved a choice.
    ChoiceResolved {
        /// The story location the choice belonged to.
        location_id: String,
        /// The picked choice.
        choice_id: String,
        /// The vital that changed.
        affects: Vital,
        /// Points removed after modifiers; negative when restoring.
        applied_cost: i32,
        /// Outcome narrative.
        outcome: String,
    },
    /// Every story location of a stage has been visited.
    StageAdvanced {
        /// The completed stage.
        from: StageId,
        /// The new stage.
        to: StageId,
    },
    /// A vital reached zero.
    GameOver {
        /// Which vital.
        cause: GameOverCause,
    },
}

/// Domain event envelope for the Narrative Proximity context.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeEvent {
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub kind: NarrativeEventKind,
}

impl DomainEvent for NarrativeEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            NarrativeEventKind::LocationTriggered(_) => LOCATION_TRIGGERED_EVENT_TYPE,
            NarrativeEventKind::SecretCollected { .. } => SECRET_COLLECTED_EVENT_TYPE,
            NarrativeEventKind::ChoicesPresented { .. } => CHOICES_PRESENTED_EVENT_TYPE,
            NarrativeEventKind::ChoiceResolved { .. } => CHOICE_RESOLVED_EVENT_TYPE,
            NarrativeEventKind::StageAdvanced { .. } => STAGE_ADVANCED_EVENT_TYPE,
            NarrativeEventKind::GameOver { .. } => GAME_OVER_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("NarrativeEventKind serialization is infallible")
    }
}
