//! Campaign loading and the location data source boundary.
//!
//! Fetch failures never reach the engines: a source that errors yields an
//! empty registry, and individually invalid records are dropped.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use wanderlore_core::error::DomainError;

use crate::domain::choices::{StageChoiceSet, StageChoices};
use crate::domain::location::NarrativeLocation;
use crate::domain::registry::LocationRegistry;

/// The campaign bundled with the binary.
pub const EMBEDDED_CAMPAIGN: &str = include_str!("../../seed/campaign.yaml");

/// Read-only provider of the location collection.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Fetches every location.
    async fn fetch_locations(&self) -> Result<Vec<NarrativeLocation>, DomainError>;
}

/// Location source over an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationSource {
    locations: Vec<NarrativeLocation>,
}

impl StaticLocationSource {
    /// Wraps a fixed list of locations.
    #[must_use]
    pub fn new(locations: Vec<NarrativeLocation>) -> Self {
        Self { locations }
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn fetch_locations(&self) -> Result<Vec<NarrativeLocation>, DomainError> {
        Ok(self.locations.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CampaignSeed {
    locations: Vec<NarrativeLocation>,
    #[serde(default)]
    stage_choices: Vec<StageChoiceSet>,
}

/// Locations plus the choice sets presented at each stage.
#[derive(Debug, Clone, Default)]
pub struct Campaign {
    /// The geofenced locations.
    pub registry: LocationRegistry,
    /// Choice sets keyed by stage.
    pub choices: StageChoices,
}

impl Campaign {
    /// Parses a YAML campaign seed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML is malformed or any
    /// record violates its invariants.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let seed: CampaignSeed = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("campaign seed is malformed: {e}")))?;
        Ok(Self {
            registry: LocationRegistry::new(seed.locations)?,
            choices: StageChoices::new(seed.stage_choices)?,
        })
    }

    /// The campaign bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the bundled seed is invalid.
    pub fn embedded() -> Result<Self, DomainError> {
        Self::from_yaml(EMBEDDED_CAMPAIGN)
    }

    /// Replaces the locations, keeping the choice sets.
    #[must_use]
    pub fn with_registry(mut self, registry: LocationRegistry) -> Self {
        self.registry = registry;
        self
    }
}

/// Loads the registry from `source`, degrading instead of failing.
pub async fn load_registry(source: &dyn LocationSource) -> LocationRegistry {
    let fetched = match source.fetch_locations().await {
        Ok(locations) => locations,
        Err(e) => {
            warn!(error = %e, "location fetch failed, continuing without geofenced content");
            return LocationRegistry::empty();
        }
    };

    let mut seen = std::collections::HashSet::new();
    let valid: Vec<NarrativeLocation> = fetched
        .into_iter()
        .filter(|location| match location.validate() {
            Ok(()) if seen.insert(location.id.clone()) => true,
            Ok(()) => {
                warn!(location_id = %location.id, "dropping duplicate location");
                false
            }
            Err(e) => {
                warn!(error = %e, "dropping invalid location");
                false
            }
        })
        .collect();

    match LocationRegistry::new(valid) {
        Ok(registry) => {
            info!(count = registry.len(), "location registry loaded");
            registry
        }
        Err(e) => {
            warn!(error = %e, "location registry rejected, continuing without geofenced content");
            LocationRegistry::empty()
        }
    }
}
