//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wanderlore_api::build_router;
use wanderlore_api::state::AppState;
use wanderlore_content::application::loading::Campaign;
use wanderlore_session::domain::aggregates::GameSession;
use wanderlore_session::domain::config::SessionConfig;
use wanderlore_session::domain::state::PlayerProgressState;
use wanderlore_session::runtime::SessionRuntime;
use wanderlore_store::MemoryStore;
use wanderlore_test_support::{FixedClock, SeededRng};
use wanderlore_world_state::domain::weather::{StaticWeatherSource, WeatherModifiers};

/// Story location of the start stage in the embedded campaign.
pub const ANCIENT_MAP: (f64, f64) = (61.4728, 23.7261);
/// Secret of the start stage in the embedded campaign.
pub const HIDDEN_COMPASS: (f64, f64) = (61.4752, 23.7309);

/// A running app and the store behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

/// Build the full app router over a live session runtime with an in-memory
/// store and deterministic Clock/RNG. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app() -> TestApp {
    build_test_app_with(PlayerProgressState::default())
}

/// Like `build_test_app`, starting from the given player state.
pub fn build_test_app_with(state: PlayerProgressState) -> TestApp {
    let config = SessionConfig {
        // Keep the timers out of the way; tests drive the session by hand.
        tick_interval_ms: 3_600_000,
        autosave_interval_ms: 3_600_000,
        ..SessionConfig::default()
    };
    let campaign = Arc::new(Campaign::embedded().unwrap());
    let clock = Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let session = GameSession::new(
        Arc::clone(&campaign),
        &config,
        state,
        clock,
        Box::new(SeededRng::from_seed(42)),
    )
    .unwrap();
    let store = Arc::new(MemoryStore::new());
    let (handle, _runtime) = SessionRuntime::spawn(
        session,
        store.clone(),
        store.clone(),
        Arc::new(StaticWeatherSource::new(WeatherModifiers::neutral())),
        &config,
    )
    .unwrap();

    TestApp {
        router: build_router(AppState::new(handle, campaign)),
        store,
    }
}

async fn read_json(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    read_json(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read_json(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read_json(app, request).await
}

/// Push a position sample to the session.
pub async fn move_to(app: &Router, (lat, lng): (f64, f64)) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/api/v1/session/position",
        &serde_json::json!({ "lat": lat, "lng": lng }),
    )
    .await
}
