//! Great-circle distance, compass labels and forward geodesics.

use serde::{Deserialize, Serialize};

use crate::position::GeoPosition;

/// Mean Earth radius used by every distance calculation.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two positions, in meters.
#[must_use]
pub fn haversine_distance_meters(a: &GeoPosition, b: &GeoPosition) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

/// One of the eight compass labels used by proximity hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompassDirection {
    /// Planar angle within 22.5 degrees of the east axis.
    East,
    /// Around 45 degrees, counter-clockwise from east.
    Northeast,
    /// Around 90 degrees.
    North,
    /// Around 135 degrees.
    Northwest,
    /// Around 180 degrees.
    West,
    /// Around 225 degrees.
    Southwest,
    /// Around 270 degrees.
    South,
    /// Around 315 degrees.
    Southeast,
}

impl CompassDirection {
    /// Lookup order for `round(angle / 45) mod 8`, where the angle is
    /// measured from the east axis. Hint text keys into this order, so it
    /// must not be rearranged into clockwise-from-north order.
    pub const HINT_ORDER: [Self; 8] = [
        Self::East,
        Self::Northeast,
        Self::North,
        Self::Northwest,
        Self::West,
        Self::Southwest,
        Self::South,
        Self::Southeast,
    ];

    /// Lowercase label, e.g. `"northeast"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::East => "east",
            Self::Northeast => "northeast",
            Self::North => "north",
            Self::Northwest => "northwest",
            Self::West => "west",
            Self::Southwest => "southwest",
            Self::South => "south",
            Self::Southeast => "southeast",
        }
    }
}

impl std::fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compass label for the direction from `from` towards `to`.
///
/// Uses the planar angle `atan2(Δlat, Δlng)` without longitude scaling.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bearing_to_compass(from: &GeoPosition, to: &GeoPosition) -> CompassDirection {
    let d_lat = to.lat - from.lat;
    let d_lng = to.lng - from.lng;
    let angle = d_lat.atan2(d_lng).to_degrees().rem_euclid(360.0);
    let index = ((angle / 45.0).round() as usize) % 8;
    CompassDirection::HINT_ORDER[index]
}

/// Point reached by travelling `distance_meters` from `origin` along the
/// initial bearing `bearing_degrees` (clockwise from north).
#[must_use]
pub fn destination_point(
    origin: &GeoPosition,
    distance_meters: f64,
    bearing_degrees: f64,
) -> GeoPosition {
    let angular = distance_meters / EARTH_RADIUS_METERS;
    let bearing = bearing_degrees.to_radians();
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPosition::new(
        lat2.to_degrees(),
        (lng2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
    )
}
