//! Wanderlore RPG — Session context.
//!
//! Composes the narrative, discovery, progression and weather engines into
//! one game session, persists the player state and drives the session from
//! a single async task.

pub mod application;
pub mod domain;
pub mod runtime;
