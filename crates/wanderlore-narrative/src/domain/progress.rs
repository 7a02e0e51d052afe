//! The player state owned by the narrative engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wanderlore_content::domain::location::StageId;

/// Upper bound of health and sanity.
pub const MAX_VITAL: u8 = 100;

/// Vitals, stage and the trigger-once bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeProgress {
    /// Physical health, `0..=100`.
    pub health: u8,
    /// Mental sanity, `0..=100`.
    pub sanity: u8,
    /// Current chapter; never regresses.
    pub stage: StageId,
    /// Ids of triggered trigger-once locations.
    #[serde(default)]
    pub visited_locations: BTreeSet<String>,
    /// Ids of collected secrets.
    #[serde(default)]
    pub discovered_secrets: BTreeSet<String>,
    /// Items granted by secrets, in collection order.
    #[serde(default)]
    pub inventory_items: Vec<String>,
}

impl Default for NarrativeProgress {
    fn default() -> Self {
        Self {
            health: MAX_VITAL,
            sanity: MAX_VITAL,
            stage: StageId::Start,
            visited_locations: BTreeSet::new(),
            discovered_secrets: BTreeSet::new(),
            inventory_items: Vec::new(),
        }
    }
}

impl NarrativeProgress {
    /// Whether either vital is depleted.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.health == 0 || self.sanity == 0
    }
}

/// Applies `delta` to `current`, clamped to `0..=MAX_VITAL`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn apply_delta(current: u8, delta: i32) -> u8 {
    i32::from(current).saturating_add(delta).clamp(0, i32::from(MAX_VITAL)) as u8
}
