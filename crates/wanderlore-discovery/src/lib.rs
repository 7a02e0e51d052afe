//! Wanderlore RPG — Procedural Discovery context.
//!
//! Scatters ephemeral collectibles around the player, auto-collects them on
//! approach, expires stale ones and schedules replacements.

pub mod application;
pub mod domain;
