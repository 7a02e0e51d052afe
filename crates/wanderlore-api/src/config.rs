//! Environment configuration for the server binary.

use std::path::PathBuf;

use wanderlore_geo::GeoPosition;
use wanderlore_session::domain::config::SessionConfig;
use wanderlore_session::domain::state::Difficulty;

use crate::error::AppError;

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind, `HOST`.
    pub host: String,
    /// Listening port, `PORT`.
    pub port: u16,
    /// Absent selects the in-memory store.
    pub database_url: Option<String>,
    /// Absent selects the embedded campaign.
    pub campaign_path: Option<PathBuf>,
    /// Difficulty of a fresh playthrough.
    pub difficulty: Difficulty,
    /// Used when the client reports no position fix.
    pub fallback_position: GeoPosition,
    /// Fixed spawn seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is set but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = SessionConfig::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let difficulty = match lookup("WANDERLORE_DIFFICULTY") {
            Some(raw) => raw.parse().map_err(AppError::Config)?,
            None => Difficulty::default(),
        };
        let coordinate = |key: &str, default: f64| -> Result<f64, AppError> {
            lookup(key).map_or(Ok(default), |raw| {
                raw.parse()
                    .map_err(|e| AppError::Config(format!("{key} must be a number: {e}")))
            })
        };
        let fallback_position = GeoPosition::new(
            coordinate("WANDERLORE_FALLBACK_LAT", defaults.fallback_position.lat)?,
            coordinate("WANDERLORE_FALLBACK_LNG", defaults.fallback_position.lng)?,
        );
        if !fallback_position.is_valid() {
            return Err(AppError::Config(
                "fallback coordinate is off the globe".to_string(),
            ));
        }
        let rng_seed = lookup("WANDERLORE_RNG_SEED")
            .map(|raw| {
                raw.parse()
                    .map_err(|e| AppError::Config(format!("WANDERLORE_RNG_SEED must be a u64: {e}")))
            })
            .transpose()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            campaign_path: lookup("WANDERLORE_CAMPAIGN").map(PathBuf::from),
            difficulty,
            fallback_position,
            rng_seed,
        })
    }

    /// The session config these settings select.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.difficulty,
            fallback_position: self.fallback_position,
            rng_seed: self.rng_seed,
            ..SessionConfig::default()
        }
    }
}
