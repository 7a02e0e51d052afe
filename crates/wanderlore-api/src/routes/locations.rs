//! Read-only routes over the location registry.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;
use wanderlore_content::application::query_handlers::{self, LocationView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationView>> {
    Json(query_handlers::list_locations(&state.campaign.registry))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LocationView>, ApiError> {
    let view = query_handlers::get_location_by_id(&state.campaign.registry, &id)?;
    Ok(Json(view))
}

/// Returns the router for location queries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations))
        .route("/{id}", get(get_location))
}
