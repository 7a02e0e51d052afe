//! Wanderlore — HTTP driver.
//!
//! Exposes one running game session to a browser client: position pushes,
//! choices and screen transitions in, session snapshots out.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full route tree over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/session", routes::session::router())
        .nest("/api/v1/locations", routes::locations::router())
        .with_state(state)
}
