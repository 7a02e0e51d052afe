//! Routes driving the running game session.
//!
//! Every command route replies with the session snapshot taken after the
//! command was applied.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use wanderlore_core::error::DomainError;
use wanderlore_discovery::domain::commands::ReshuffleDiscoveries;
use wanderlore_geo::{GeoPosition, PositionError, PositionUpdate};
use wanderlore_narrative::domain::commands::MakeChoice;
use wanderlore_session::application::query_handlers::SessionSnapshot;
use wanderlore_session::domain::commands::SessionCommand;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /position.
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Reported accuracy in meters.
    pub accuracy: Option<f64>,
    /// Fix time in milliseconds since the epoch.
    pub timestamp: Option<i64>,
}

/// Request body for POST /position-unavailable.
#[derive(Debug, Deserialize)]
pub struct PositionUnavailableRequest {
    /// `permission_denied`, `timeout`, or a free-form failure description.
    pub reason: String,
}

impl PositionUnavailableRequest {
    fn into_error(self) -> PositionError {
        match self.reason.as_str() {
            "permission_denied" => PositionError::PermissionDenied,
            "timeout" => PositionError::Timeout,
            _ => PositionError::Unavailable(self.reason),
        }
    }
}

/// Request body for POST /choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceRequest {
    /// Id of a choice in the active choice set.
    pub choice_id: String,
}

async fn dispatch(
    state: &AppState,
    command: SessionCommand,
) -> Result<Json<SessionSnapshot>, ApiError> {
    info!(command = command.name(), "dispatching session command");
    let snapshot = state.session.send(command).await?;
    Ok(Json(snapshot))
}

/// GET /
#[instrument(skip(state))]
async fn get_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// POST /position
#[instrument(skip(state, request), fields(lat = request.lat, lng = request.lng))]
async fn push_position(
    State(state): State<AppState>,
    Json(request): Json<PositionRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut position = GeoPosition::new(request.lat, request.lng);
    if let Some(accuracy) = request.accuracy {
        position = position.with_accuracy(accuracy);
    }
    if let Some(timestamp) = request.timestamp {
        position = position.with_timestamp(timestamp);
    }
    if !position.is_valid() {
        return Err(DomainError::Validation(format!(
            "position ({}, {}) is out of range",
            request.lat, request.lng
        ))
        .into());
    }
    dispatch(&state, SessionCommand::Position(PositionUpdate::Sample(position))).await
}

/// POST /position-unavailable
#[instrument(skip(state, request), fields(reason = %request.reason))]
async fn position_unavailable(
    State(state): State<AppState>,
    Json(request): Json<PositionUnavailableRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let update = PositionUpdate::Unavailable(request.into_error());
    dispatch(&state, SessionCommand::Position(update)).await
}

/// POST /choice
#[instrument(skip(state, request), fields(choice_id = %request.choice_id))]
async fn make_choice(
    State(state): State<AppState>,
    Json(request): Json<ChoiceRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = MakeChoice {
        correlation_id: Uuid::new_v4(),
        choice_id: request.choice_id,
    };
    dispatch(&state, SessionCommand::MakeChoice(command)).await
}

/// POST /discoveries/reshuffle
#[instrument(skip(state))]
async fn reshuffle(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = ReshuffleDiscoveries {
        correlation_id: Uuid::new_v4(),
    };
    dispatch(&state, SessionCommand::Reshuffle(command)).await
}

/// POST /cutscene/finish
#[instrument(skip(state))]
async fn finish_cutscene(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::FinishCutscene).await
}

/// POST /intro/finish
#[instrument(skip(state))]
async fn finish_intro(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::FinishIntro).await
}

/// POST /pause
#[instrument(skip(state))]
async fn pause(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::Pause).await
}

/// POST /resume
#[instrument(skip(state))]
async fn resume(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::Resume).await
}

/// POST /save
#[instrument(skip(state))]
async fn save(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::Save).await
}

/// POST /reset
#[instrument(skip(state))]
async fn reset(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, ApiError> {
    dispatch(&state, SessionCommand::Reset).await
}

/// Returns the router for the session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/position", post(push_position))
        .route("/position-unavailable", post(position_unavailable))
        .route("/choice", post(make_choice))
        .route("/discoveries/reshuffle", post(reshuffle))
        .route("/cutscene/finish", post(finish_cutscene))
        .route("/intro/finish", post(finish_intro))
        .route("/pause", post(pause))
        .route("/resume", post(resume))
        .route("/save", post(save))
        .route("/reset", post(reset))
}
