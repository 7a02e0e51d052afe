//! Wanderlore RPG — World State context.
//!
//! Tracks the environmental modifiers (weather-derived difficulty, sanity
//! drain, visibility) that scale narrative choice costs.

pub mod application;
pub mod domain;
