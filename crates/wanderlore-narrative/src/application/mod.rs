//! Application layer for the Narrative Proximity context.

pub mod command_handlers;
pub mod query_handlers;
