//! Wanderlore RPG — geodesic math, geofencing and position tracking.
//!
//! Both proximity engines measure the player against fixed and procedural
//! points through the same primitives defined here.

pub mod distance;
pub mod geofence;
pub mod position;

pub use distance::{
    CompassDirection, EARTH_RADIUS_METERS, bearing_to_compass, destination_point,
    haversine_distance_meters,
};
pub use geofence::{Located, Proximity, measure, nearest, within};
pub use position::{
    ChannelPositionSource, GeoPosition, PermissionState, PositionAdvisory, PositionError,
    PositionOutcome, PositionSource, PositionTracker, PositionUpdate,
};
