//! Domain events for the Progression context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wanderlore_core::event::DomainEvent;

/// Event type identifier for [`ProgressionEventKind::XpAwarded`].
pub const XP_AWARDED_EVENT_TYPE: &str = "progression.xp_awarded";

/// Event type identifier for [`ProgressionEventKind::LevelUp`].
pub const LEVEL_UP_EVENT_TYPE: &str = "progression.level_up";

/// Event type identifier for [`ProgressionEventKind::StageChanged`].
pub const STAGE_CHANGED_EVENT_TYPE: &str = "progression.stage_changed";

/// Event type identifier for [`ProgressionEventKind::AchievementUnlocked`].
pub const ACHIEVEMENT_UNLOCKED_EVENT_TYPE: &str = "progression.achievement_unlocked";

/// Event type identifier for [`ProgressionEventKind::LoreUnlocked`].
pub const LORE_UNLOCKED_EVENT_TYPE: &str = "progression.lore_unlocked";

/// Event payload variants for the Progression context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressionEventKind {
    /// XP was added to the ledger.
    XpAwarded {
        /// XP added.
        amount: f64,
        /// What earned it.
        source: String,
        /// Lifetime XP after the award.
        total_xp: f64,
    },
    /// The player reached a new level.
    LevelUp {
        /// The new level.
        level: u32,
    },
    /// The named consciousness stage changed.
    StageChanged {
        /// Previous stage name.
        from: String,
        /// New stage name.
        to: String,
        /// Display color of the new stage.
        color: String,
    },
    /// An achievement was unlocked for the first time.
    AchievementUnlocked {
        /// Achievement identifier.
        achievement_id: String,
    },
    /// A lore entry was unlocked for the first time.
    LoreUnlocked {
        /// Lore identifier.
        lore_id: String,
    },
}

/// Domain event envelope for the Progression context.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEvent {
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub kind: ProgressionEventKind,
}

impl DomainEvent for ProgressionEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ProgressionEventKind::XpAwarded { .. } => XP_AWARDED_EVENT_TYPE,
            ProgressionEventKind::LevelUp { .. } => LEVEL_UP_EVENT_TYPE,
            ProgressionEventKind::StageChanged { .. } => STAGE_CHANGED_EVENT_TYPE,
            ProgressionEventKind::AchievementUnlocked { .. } => ACHIEVEMENT_UNLOCKED_EVENT_TYPE,
            ProgressionEventKind::LoreUnlocked { .. } => LORE_UNLOCKED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProgressionEventKind serialization is infallible")
    }
}
