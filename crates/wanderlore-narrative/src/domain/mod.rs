//! Domain layer for the Narrative Proximity context.

pub mod aggregates;
pub mod commands;
pub mod config;
pub mod events;
pub mod progress;
pub mod screen;
