//! Domain layer for the Progression context.

pub mod aggregates;
pub mod curve;
pub mod events;
