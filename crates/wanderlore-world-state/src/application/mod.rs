//! Application layer for the World State context.

pub mod command_handlers;
