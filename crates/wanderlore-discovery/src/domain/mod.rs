//! Domain layer for the Procedural Discovery context.

pub mod aggregates;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod events;
pub mod spawn;
