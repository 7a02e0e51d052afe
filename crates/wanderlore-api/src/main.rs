//! Wanderlore API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use wanderlore_api::config::AppConfig;
use wanderlore_api::error::AppError;
use wanderlore_api::state::AppState;
use wanderlore_content::application::loading::{Campaign, LocationSource, load_registry};
use wanderlore_core::clock::SystemClock;
use wanderlore_core::rng::SeededRng;
use wanderlore_core::store::{HighscoreSink, KeyValueStore};
use wanderlore_session::application::persistence::load_player_state;
use wanderlore_session::domain::aggregates::GameSession;
use wanderlore_session::domain::commands::SessionCommand;
use wanderlore_session::runtime::SessionRuntime;
use wanderlore_store::{MemoryStore, PgStore};
use wanderlore_world_state::domain::weather::{StaticWeatherSource, WeatherModifiers};

type Ports = (
    Arc<dyn KeyValueStore>,
    Arc<dyn HighscoreSink>,
    Arc<dyn LocationSource>,
);

async fn connect_ports(config: &AppConfig, campaign: &Campaign) -> Result<Ports, AppError> {
    let Some(database_url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set, using the in-memory store");
        let store = Arc::new(MemoryStore::with_locations(
            campaign.registry.locations().to_vec(),
        ));
        let ports: Ports = (store.clone(), store.clone(), store);
        return Ok(ports);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(sqlx::Error::from)?;

    let store = Arc::new(PgStore::new(pool));
    let seeded = store.seed_locations(campaign.registry.locations()).await?;
    tracing::info!(seeded, "PostgreSQL store ready");
    let ports: Ports = (store.clone(), store.clone(), store);
    Ok(ports)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Wanderlore API server");

    let config = AppConfig::from_env()?;
    let session_config = config.session_config();

    // Load the campaign; the location source may replace its locations.
    let campaign = match &config.campaign_path {
        Some(path) => Campaign::from_yaml(&tokio::fs::read_to_string(path).await?)?,
        None => Campaign::embedded()?,
    };
    let (store, highscores, locations) = connect_ports(&config, &campaign).await?;
    let registry = load_registry(locations.as_ref()).await;
    let campaign = Arc::new(campaign.with_registry(registry));

    // Assemble and start the session.
    let state = load_player_state(store.as_ref(), session_config.difficulty).await;
    let rng = session_config
        .rng_seed
        .map_or_else(SeededRng::from_entropy, SeededRng::from_seed);
    let session = GameSession::new(
        Arc::clone(&campaign),
        &session_config,
        state,
        Arc::new(SystemClock),
        Box::new(rng),
    )?;
    let weather = Arc::new(StaticWeatherSource::new(WeatherModifiers::neutral()));
    let (handle, runtime) =
        SessionRuntime::spawn(session, store, highscores, weather, &session_config)?;

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = wanderlore_api::build_router(AppState::new(handle.clone(), campaign))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Persist and tear down the session before exiting.
    if let Err(e) = handle.send(SessionCommand::Shutdown).await {
        tracing::warn!(error = %e, "session already stopped");
    }
    if let Err(e) = runtime.await {
        tracing::warn!(error = %e, "session runtime ended abnormally");
    }

    Ok(())
}
