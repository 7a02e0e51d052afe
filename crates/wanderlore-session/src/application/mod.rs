//! Application layer for the Session context.

pub mod highscore;
pub mod persistence;
pub mod query_handlers;
