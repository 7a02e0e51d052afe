//! Query handlers for the Content context.
//!
//! Read-only views over the location registry for outer surfaces.

use serde::Serialize;
use wanderlore_core::error::DomainError;

use crate::domain::location::{LocationKind, NarrativeLocation, StageId};
use crate::domain::registry::LocationRegistry;

/// Read-only view of a narrative location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    /// The location identifier.
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
    pub radius: f64,
    /// Stage the location belongs to.
    pub stage: StageId,
}

impl From<&NarrativeLocation> for LocationView {
    fn from(location: &NarrativeLocation) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            kind: location.kind,
            lat: location.lat,
            lng: location.lng,
            radius: location.trigger_radius_meters,
            stage: location.stage,
        }
    }
}

/// Lists every location in registry order.
#[must_use]
pub fn list_locations(registry: &LocationRegistry) -> Vec<LocationView> {
    registry.locations().iter().map(LocationView::from).collect()
}

/// Retrieves one location.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown.
pub fn get_location_by_id(
    registry: &LocationRegistry,
    id: &str,
) -> Result<LocationView, DomainError> {
    registry.location_by_id(id).map(LocationView::from)
}
