//! `PostgreSQL` implementation of the storage ports.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;
use wanderlore_content::application::loading::LocationSource;
use wanderlore_content::domain::location::NarrativeLocation;
use wanderlore_core::error::DomainError;
use wanderlore_core::store::{HighscoreEntry, HighscoreSink, KeyValueStore};

fn infrastructure(e: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

/// PostgreSQL-backed snapshots, highscores and locations.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the given locations, keeping rows that already exist.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a write fails.
    pub async fn seed_locations(&self, locations: &[NarrativeLocation]) -> Result<u64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| infrastructure(&e))?;
        let mut inserted = 0;
        for (position, location) in locations.iter().enumerate() {
            let data = serde_json::to_value(location)
                .expect("NarrativeLocation serialization is infallible");
            let result = sqlx::query(
                "INSERT INTO narrative_locations (location_id, position, data)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (location_id) DO NOTHING",
            )
            .bind(&location.id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .bind(data)
            .execute(&mut *tx)
            .await
            .map_err(|e| infrastructure(&e))?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(|e| infrastructure(&e))?;
        debug!(inserted, "narrative locations seeded");
        Ok(inserted)
    }

    /// Highest scores first, ranked by stages then artifacts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the query fails.
    pub async fn top_highscores(&self, limit: i64) -> Result<Vec<HighscoreEntry>, DomainError> {
        let rows: Vec<(i32, i32, i16, i16, String)> = sqlx::query_as(
            "SELECT stages_completed, artifacts_found, final_health, final_sanity, difficulty
             FROM highscores
             ORDER BY stages_completed DESC, artifacts_found DESC, submitted_at ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;

        Ok(rows
            .into_iter()
            .map(|(stages, artifacts, health, sanity, difficulty)| HighscoreEntry {
                stages_completed: u32::try_from(stages).unwrap_or(0),
                artifacts_found: u32::try_from(artifacts).unwrap_or(0),
                final_health: u8::try_from(health).unwrap_or(0),
                final_sanity: u8::try_from(sanity).unwrap_or(0),
                difficulty,
            })
            .collect())
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT value FROM kv_snapshots WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| infrastructure(&e))?;
        Ok(row.map(|(value,)| value))
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO kv_snapshots (key, value)
             VALUES ($1, $2)
             ON CONFLICT (key)
             DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM kv_snapshots WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;
        Ok(())
    }
}

#[async_trait]
impl HighscoreSink for PgStore {
    async fn submit(&self, entry: &HighscoreEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO highscores
                (highscore_id, stages_completed, artifacts_found, final_health, final_sanity, difficulty)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::now_v7())
        .bind(i32::try_from(entry.stages_completed).unwrap_or(i32::MAX))
        .bind(i32::try_from(entry.artifacts_found).unwrap_or(i32::MAX))
        .bind(i16::from(entry.final_health))
        .bind(i16::from(entry.final_sanity))
        .bind(&entry.difficulty)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(())
    }
}

#[async_trait]
impl LocationSource for PgStore {
    async fn fetch_locations(&self) -> Result<Vec<NarrativeLocation>, DomainError> {
        let rows: Vec<(String, serde_json::Value)> = sqlx::query_as(
            "SELECT location_id, data FROM narrative_locations ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;

        Ok(rows
            .into_iter()
            .filter_map(|(location_id, data)| match serde_json::from_value(data) {
                Ok(location) => Some(location),
                Err(e) => {
                    warn!(%location_id, error = %e, "skipping unreadable location row");
                    None
                }
            })
            .collect())
    }
}
