//! The shared geofencing primitive.
//!
//! Narrative locations and procedural discoveries are both measured
//! through [`measure`], then filtered by whatever radius the caller owns.

use crate::distance::haversine_distance_meters;
use crate::position::GeoPosition;

/// Anything with a fixed coordinate on the map.
pub trait Located {
    /// The coordinate of this item.
    fn location(&self) -> GeoPosition;
}

impl Located for GeoPosition {
    fn location(&self) -> GeoPosition {
        *self
    }
}

/// An item paired with its distance from the measuring position.
#[derive(Debug)]
pub struct Proximity<'a, T> {
    /// The measured item.
    pub item: &'a T,
    /// Great-circle distance in meters.
    pub distance_meters: f64,
}

impl<T> Clone for Proximity<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Proximity<'_, T> {}

impl<T> Proximity<'_, T> {
    /// Whether the item lies within `radius_meters`, boundary inclusive.
    #[must_use]
    pub fn is_within(&self, radius_meters: f64) -> bool {
        self.distance_meters <= radius_meters
    }
}

/// Measures every item against `origin`, preserving iteration order.
pub fn measure<'a, T, I>(origin: &GeoPosition, items: I) -> Vec<Proximity<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| Proximity {
            item,
            distance_meters: haversine_distance_meters(origin, &item.location()),
        })
        .collect()
}

/// Items inside their own radius, in iteration order.
pub fn within<'a, T, I, R>(origin: &GeoPosition, items: I, radius: R) -> Vec<Proximity<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
    R: Fn(&T) -> f64,
{
    measure(origin, items)
        .into_iter()
        .filter(|p| p.is_within(radius(p.item)))
        .collect()
}

/// The `limit` closest items, nearest first. Ties keep iteration order.
pub fn nearest<'a, T, I>(origin: &GeoPosition, items: I, limit: usize) -> Vec<Proximity<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut ranked = measure(origin, items);
    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked.truncate(limit);
    ranked
}
