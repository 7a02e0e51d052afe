//! Wanderlore — storage adapters.
//!
//! Implementations of the persistence, highscore and location ports defined
//! by the core and content crates.

pub mod memory_store;
pub mod pg_store;

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
