//! Wanderlore RPG — Progression context.
//!
//! Responsible for consciousness XP, level-ups, named consciousness stages,
//! achievements and unlocked lore.

pub mod domain;
