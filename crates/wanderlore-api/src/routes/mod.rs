//! Route modules organized by surface.

pub mod health;
pub mod locations;
pub mod session;
