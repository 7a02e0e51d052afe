//! Wanderlore RPG — Content context.
//!
//! Owns the geofenced narrative locations, the ordered story stages and the
//! choice sets presented at each stage. Location data is immutable once
//! loaded; the registry is a passive lookup table.

pub mod application;
pub mod domain;
