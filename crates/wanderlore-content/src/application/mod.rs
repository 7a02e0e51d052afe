//! Application layer for the Content context.

pub mod loading;
pub mod query_handlers;
