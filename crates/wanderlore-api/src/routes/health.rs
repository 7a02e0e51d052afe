//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the session runtime is still accepting commands.
    pub session_running: bool,
    /// Number of geofenced locations loaded.
    pub locations: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session_running = !state.session.is_closed();
    Json(HealthResponse {
        status: if session_running { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        session_running,
        locations: state.campaign.registry.len(),
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
