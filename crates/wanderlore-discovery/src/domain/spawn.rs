//! Placement of procedural spawns around the player.

use std::f64::consts::TAU;

use wanderlore_core::rng::DeterministicRng;
use wanderlore_geo::{EARTH_RADIUS_METERS, GeoPosition};

/// Picks a point uniformly by area inside `radius_meters` of `center`, never
/// closer than `min_distance_meters`.
///
/// Draws the angle first and the radial fraction second. The offset is
/// converted with an equirectangular approximation.
pub fn spawn_point(
    center: &GeoPosition,
    radius_meters: f64,
    min_distance_meters: f64,
    rng: &mut dyn DeterministicRng,
) -> GeoPosition {
    let angle = rng.next_f64() * TAU;
    let distance = (rng.next_f64().sqrt() * radius_meters).max(min_distance_meters);

    let north = distance * angle.cos();
    let east = distance * angle.sin();
    let d_lat = (north / EARTH_RADIUS_METERS).to_degrees();
    let d_lng = (east / (EARTH_RADIUS_METERS * center.lat.to_radians().cos())).to_degrees();

    GeoPosition::new(center.lat + d_lat, center.lng + d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanderlore_geo::haversine_distance_meters;
    use wanderlore_test_support::{SeededRng, SequenceRng};

    const TAMPERE: (f64, f64) = (61.4978, 23.7610);

    #[test]
    fn test_spawns_stay_within_configured_ring() {
        // Arrange
        let center = GeoPosition::new(TAMPERE.0, TAMPERE.1);
        let mut rng = SeededRng::from_seed(7);

        for _ in 0..1_000 {
            // Act
            let point = spawn_point(&center, 200.0, 20.0, &mut rng);

            // Assert
            let distance = haversine_distance_meters(&center, &point);
            assert!(distance >= 20.0 - 0.5, "too close: {distance}");
            assert!(distance <= 200.0 + 0.5, "too far: {distance}");
        }
    }

    #[test]
    fn test_small_radial_draw_is_pushed_to_floor() {
        let center = GeoPosition::new(TAMPERE.0, TAMPERE.1);
        let mut rng = SequenceRng::with_floats(vec![0.0, 0.0]);

        let point = spawn_point(&center, 200.0, 20.0, &mut rng);

        let distance = haversine_distance_meters(&center, &point);
        assert!((distance - 20.0).abs() < 0.1);
        assert!(point.lat > center.lat);
    }

    #[test]
    fn test_radial_draw_uses_square_root() {
        // A quarter of the unit draw lands at half the radius.
        let center = GeoPosition::new(TAMPERE.0, TAMPERE.1);
        let mut rng = SequenceRng::with_floats(vec![0.25, 0.25]);

        let point = spawn_point(&center, 200.0, 20.0, &mut rng);

        let distance = haversine_distance_meters(&center, &point);
        assert!((distance - 100.0).abs() < 0.5);
        assert!(point.lng > center.lng);
    }
}
