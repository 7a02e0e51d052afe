//! Test collaborators for the persistence and highscore ports.

use std::sync::Mutex;

use async_trait::async_trait;
use wanderlore_core::error::DomainError;
use wanderlore_core::store::{HighscoreEntry, HighscoreSink, KeyValueStore};

/// A key-value store that always returns an infrastructure error. Useful for
/// testing that persistence failures are swallowed.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn load(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Err(DomainError::Infrastructure("storage quota exceeded".into()))
    }

    async fn save(&self, _key: &str, _value: &serde_json::Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage quota exceeded".into()))
    }
}

/// A highscore sink that records every submission.
#[derive(Debug, Default)]
pub struct RecordingHighscoreSink {
    submitted: Mutex<Vec<HighscoreEntry>>,
}

impl RecordingHighscoreSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every submitted entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submitted(&self) -> Vec<HighscoreEntry> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl HighscoreSink for RecordingHighscoreSink {
    async fn submit(&self, entry: &HighscoreEntry) -> Result<(), DomainError> {
        self.submitted.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// A highscore sink that always fails.
#[derive(Debug)]
pub struct FailingHighscoreSink;

#[async_trait]
impl HighscoreSink for FailingHighscoreSink {
    async fn submit(&self, _entry: &HighscoreEntry) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("highscore service unavailable".into()))
    }
}
