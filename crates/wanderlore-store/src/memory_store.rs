//! In-process implementation of the storage ports.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use wanderlore_content::application::loading::LocationSource;
use wanderlore_content::domain::location::NarrativeLocation;
use wanderlore_core::error::DomainError;
use wanderlore_core::store::{HighscoreEntry, HighscoreSink, KeyValueStore};

/// Key-value store, highscore list and location source held in memory.
///
/// Serves local play and tests. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
    highscores: Mutex<Vec<HighscoreEntry>>,
    locations: Vec<NarrativeLocation>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that serves `locations` as its location source.
    #[must_use]
    pub fn with_locations(locations: Vec<NarrativeLocation>) -> Self {
        Self {
            locations,
            ..Self::default()
        }
    }

    /// Every highscore submitted so far, oldest first.
    pub fn highscores(&self) -> Vec<HighscoreEntry> {
        self.highscores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

#[async_trait]
impl HighscoreSink for MemoryStore {
    async fn submit(&self, entry: &HighscoreEntry) -> Result<(), DomainError> {
        self.highscores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl LocationSource for MemoryStore {
    async fn fetch_locations(&self) -> Result<Vec<NarrativeLocation>, DomainError> {
        Ok(self.locations.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wanderlore_content::application::loading::Campaign;

    use super::*;

    #[tokio::test]
    async fn test_load_returns_none_for_missing_key() {
        let store = MemoryStore::new();

        let loaded = store.load("absent").await.unwrap();

        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_value() {
        // Arrange
        let store = MemoryStore::new();
        store.save("player", &json!({"health": 100, "sanity": 90})).await.unwrap();

        // Act
        store.save("player", &json!({"health": 40})).await.unwrap();

        // Assert
        assert_eq!(store.load("player").await.unwrap(), Some(json!({"health": 40})));
    }

    #[tokio::test]
    async fn test_remove_missing_key_succeeds() {
        let store = MemoryStore::new();
        store.save("player", &json!(1)).await.unwrap();

        store.remove("player").await.unwrap();
        store.remove("player").await.unwrap();

        assert!(store.load("player").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submitted_highscores_are_kept_in_order() {
        let store = MemoryStore::new();
        let entry = |stages| HighscoreEntry {
            stages_completed: stages,
            artifacts_found: 1,
            final_health: 0,
            final_sanity: 55,
            difficulty: "hard".into(),
        };

        store.submit(&entry(2)).await.unwrap();
        store.submit(&entry(4)).await.unwrap();

        let stages: Vec<u32> = store.highscores().iter().map(|e| e.stages_completed).collect();
        assert_eq!(stages, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_serves_configured_locations() {
        let campaign = Campaign::embedded().unwrap();
        let store = MemoryStore::with_locations(campaign.registry.locations().to_vec());

        let fetched = store.fetch_locations().await.unwrap();

        assert_eq!(fetched.len(), campaign.registry.len());
        assert_eq!(fetched[0].id, campaign.registry.locations()[0].id);
    }
}
