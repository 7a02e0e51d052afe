//! Wanderlore RPG — Narrative Proximity context.
//!
//! Turns position samples into one-shot location triggers, resolves the
//! choices presented at story locations, tracks health and sanity and
//! advances the campaign through its stages.

pub mod application;
pub mod domain;
