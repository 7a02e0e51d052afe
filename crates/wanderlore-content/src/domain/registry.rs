//! The geofence location registry.

use std::collections::HashMap;

use wanderlore_core::error::DomainError;

use super::location::{LocationKind, NarrativeLocation, StageId};

/// Immutable lookup table over the campaign's narrative locations.
///
/// Iteration order is load order and is the tie-break order for locations
/// that trigger in the same tick.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<NarrativeLocation>,
    index: HashMap<String, usize>,
}

impl LocationRegistry {
    /// Builds a registry, validating every record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a record is invalid or an id
    /// appears twice.
    pub fn new(locations: Vec<NarrativeLocation>) -> Result<Self, DomainError> {
        let mut index = HashMap::with_capacity(locations.len());
        for (position, location) in locations.iter().enumerate() {
            location.validate()?;
            if index.insert(location.id.clone(), position).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate location id {}",
                    location.id
                )));
            }
        }
        Ok(Self { locations, index })
    }

    /// A registry with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All locations in load order.
    #[must_use]
    pub fn locations(&self) -> &[NarrativeLocation] {
        &self.locations
    }

    /// Looks up a location by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no location has that id.
    pub fn location_by_id(&self, id: &str) -> Result<&NarrativeLocation, DomainError> {
        self.index
            .get(id)
            .map(|&i| &self.locations[i])
            .ok_or_else(|| DomainError::NotFound(format!("location {id}")))
    }

    /// Story locations that gate advancement out of `stage`.
    pub fn story_locations_for(&self, stage: StageId) -> impl Iterator<Item = &NarrativeLocation> {
        self.locations
            .iter()
            .filter(move |l| l.kind == LocationKind::Story && l.stage == stage)
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the registry holds no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str, kind: LocationKind, stage: StageId) -> NarrativeLocation {
        NarrativeLocation {
            id: id.to_owned(),
            name: id.to_owned(),
            kind,
            lat: 61.4728,
            lng: 23.7261,
            trigger_radius_meters: 50.0,
            stage,
            narrative_text: None,
            reward_item_id: None,
            cutscene_payload: None,
        }
    }

    #[test]
    fn test_location_by_id_finds_and_misses() {
        let registry = LocationRegistry::new(vec![
            location("ancient_map", LocationKind::Story, StageId::Start),
            location("hidden_compass", LocationKind::Secret, StageId::Start),
        ])
        .unwrap();

        assert_eq!(registry.location_by_id("hidden_compass").unwrap().kind, LocationKind::Secret);
        match registry.location_by_id("nowhere") {
            Err(DomainError::NotFound(what)) => assert_eq!(what, "location nowhere"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = LocationRegistry::new(vec![
            location("a", LocationKind::Story, StageId::Start),
            location("a", LocationKind::Secret, StageId::One),
        ]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_story_locations_for_filters_kind_and_stage() {
        let registry = LocationRegistry::new(vec![
            location("s1", LocationKind::Story, StageId::One),
            location("c1", LocationKind::Cutscene, StageId::One),
            location("x1", LocationKind::Secret, StageId::One),
            location("s2", LocationKind::Story, StageId::Two),
            location("s1b", LocationKind::Story, StageId::One),
        ])
        .unwrap();

        let ids: Vec<_> = registry
            .story_locations_for(StageId::One)
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, ["s1", "s1b"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = LocationRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
