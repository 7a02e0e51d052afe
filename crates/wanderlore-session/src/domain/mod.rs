//! Domain layer for the Session context.

pub mod aggregates;
pub mod commands;
pub mod config;
pub mod events;
pub mod state;
