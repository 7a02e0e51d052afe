//! Domain layer for the Content context.

pub mod choices;
pub mod location;
pub mod registry;
