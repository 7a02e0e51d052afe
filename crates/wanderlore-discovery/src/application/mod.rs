//! Application layer for the Procedural Discovery context.

pub mod command_handlers;
pub mod query_handlers;
