//! Position update fixtures.

use wanderlore_geo::{GeoPosition, PositionUpdate, destination_point};

/// A valid sample at the given coordinate.
#[must_use]
pub fn sample(lat: f64, lng: f64) -> PositionUpdate {
    PositionUpdate::Sample(GeoPosition::new(lat, lng))
}

/// A sample `meters` away from `origin` along `bearing_degrees`.
#[must_use]
pub fn moved(origin: &GeoPosition, meters: f64, bearing_degrees: f64) -> PositionUpdate {
    PositionUpdate::Sample(destination_point(origin, meters, bearing_degrees))
}
