//! Narrative locations and the stage order they belong to.

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;
use wanderlore_geo::{GeoPosition, Located};

/// Narrative chapter. Declaration order is the progression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    /// Before the first chapter.
    #[serde(rename = "start")]
    Start,
    /// Chapter one.
    #[serde(rename = "1")]
    One,
    /// Chapter two.
    #[serde(rename = "2")]
    Two,
    /// Chapter three.
    #[serde(rename = "3")]
    Three,
    /// The ending; terminal.
    #[serde(rename = "final")]
    Final,
}

impl StageId {
    /// Every stage in progression order.
    pub const ALL: [Self; 5] = [Self::Start, Self::One, Self::Two, Self::Three, Self::Final];

    /// The stage after this one, or `None` at `Final`.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::One),
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Final),
            Self::Final => None,
        }
    }

    /// Zero-based position in the progression order.
    #[must_use]
    pub fn ordinal(self) -> u32 {
        match self {
            Self::Start => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Final => 4,
        }
    }

    /// The wire label, e.g. `"start"` or `"2"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What entering a location's geofence does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// Story beat with a choice; trigger-once.
    Story,
    /// Collectible secret granting an item; trigger-once.
    Secret,
    /// Cutscene; re-triggerable.
    Cutscene,
    /// Opens the character intro; trigger-once.
    Startgame,
}

impl LocationKind {
    /// Whether the location stays eligible after it has been triggered.
    #[must_use]
    pub fn is_retriggerable(self) -> bool {
        matches!(self, Self::Cutscene)
    }
}

/// A fixed geofenced point of the campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeLocation {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Trigger behavior.
    pub kind: LocationKind,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Geofence radius in meters.
    #[serde(alias = "radius")]
    pub trigger_radius_meters: f64,
    /// Stage this location belongs to.
    pub stage: StageId,
    /// Text shown when the location triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_text: Option<String>,
    /// Inventory item granted by a secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_item_id: Option<String>,
    /// Opaque data handed to the cutscene renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutscene_payload: Option<serde_json::Value>,
}

impl NarrativeLocation {
    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty id, an off-globe
    /// coordinate or a negative radius.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::Validation(
                "location id must not be empty".to_owned(),
            ));
        }
        if !self.location().is_valid() {
            return Err(DomainError::Validation(format!(
                "location {} has an invalid coordinate ({}, {})",
                self.id, self.lat, self.lng
            )));
        }
        if !self.trigger_radius_meters.is_finite() || self.trigger_radius_meters < 0.0 {
            return Err(DomainError::Validation(format!(
                "location {} has a negative trigger radius",
                self.id
            )));
        }
        Ok(())
    }
}

impl Located for NarrativeLocation {
    fn location(&self) -> GeoPosition {
        GeoPosition::new(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> NarrativeLocation {
        NarrativeLocation {
            id: "ancient_map".to_owned(),
            name: "The Ancient Map".to_owned(),
            kind: LocationKind::Story,
            lat: 61.4728,
            lng: 23.7261,
            trigger_radius_meters: 50.0,
            stage: StageId::Start,
            narrative_text: None,
            reward_item_id: None,
            cutscene_payload: None,
        }
    }

    #[test]
    fn test_stage_order_is_strict() {
        assert!(StageId::Start < StageId::One);
        assert!(StageId::One < StageId::Two);
        assert!(StageId::Two < StageId::Three);
        assert!(StageId::Three < StageId::Final);
        assert_eq!(StageId::Three.next(), Some(StageId::Final));
        assert_eq!(StageId::Final.next(), None);
    }

    #[test]
    fn test_stage_wire_labels() {
        let labels: Vec<String> = StageId::ALL
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect();
        assert_eq!(labels, ["\"start\"", "\"1\"", "\"2\"", "\"3\"", "\"final\""]);
        assert_eq!(serde_json::from_str::<StageId>("\"2\"").unwrap(), StageId::Two);
    }

    #[test]
    fn test_only_cutscenes_are_retriggerable() {
        assert!(LocationKind::Cutscene.is_retriggerable());
        assert!(!LocationKind::Story.is_retriggerable());
        assert!(!LocationKind::Secret.is_retriggerable());
        assert!(!LocationKind::Startgame.is_retriggerable());
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        assert!(location().validate().is_ok());

        let mut empty_id = location();
        empty_id.id = "  ".to_owned();
        assert!(empty_id.validate().is_err());

        let mut negative = location();
        negative.trigger_radius_meters = -5.0;
        assert!(negative.validate().is_err());

        let mut off_globe = location();
        off_globe.lat = 95.0;
        assert!(off_globe.validate().is_err());
    }

    #[test]
    fn test_deserializes_backend_radius_alias() {
        let json = serde_json::json!({
            "id": "hidden_compass",
            "name": "Hidden Compass",
            "kind": "secret",
            "lat": 61.5,
            "lng": 23.7,
            "radius": 25.0,
            "stage": "1",
            "rewardItemId": "compass"
        });

        let parsed: NarrativeLocation = serde_json::from_value(json).unwrap();

        assert!((parsed.trigger_radius_meters - 25.0).abs() < f64::EPSILON);
        assert_eq!(parsed.stage, StageId::One);
        assert_eq!(parsed.reward_item_id.as_deref(), Some("compass"));
    }
}
