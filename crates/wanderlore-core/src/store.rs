//! Persistence and score-reporting ports.
//!
//! The engines never perform I/O themselves; the session hands their state
//! to these traits at the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Whole-value key-value storage, in the manner of browser `localStorage`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the value stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;

    /// Replaces the value stored under `key`.
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError>;

    /// Deletes the value stored under `key`. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// Final score submitted when a session reaches game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighscoreEntry {
    /// Number of narrative stages advanced past.
    pub stages_completed: u32,
    /// Number of secret artifacts collected.
    pub artifacts_found: u32,
    /// Health at the end of the session.
    pub final_health: u8,
    /// Sanity at the end of the session.
    pub final_sanity: u8,
    /// Difficulty label the session was played on.
    pub difficulty: String,
}

/// Fire-and-forget score sink.
#[async_trait]
pub trait HighscoreSink: Send + Sync {
    /// Records a finished session.
    async fn submit(&self, entry: &HighscoreEntry) -> Result<(), DomainError>;
}
