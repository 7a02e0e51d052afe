//! Wanderlore — startup failures and HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use wanderlore_core::error::DomainError;

/// Why the server could not start or keep serving.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable such as `PORT` or `WANDERLORE_DIFFICULTY`
    /// did not parse.
    #[error("configuration error: {0}")]
    Config(String),

    /// The campaign, location registry or session config was rejected.
    #[error("startup error: {0}")]
    Domain(#[from] DomainError),

    /// Connecting, migrating or seeding Postgres failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Binding the listener or serving failed.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// `not_found`, `validation_error` or `infrastructure_error`.
    pub error: &'static str,
    /// The domain error text, e.g. `not found: location lost_tower`.
    pub message: String,
}

/// A `DomainError` from a location query or the session runtime, rendered
/// as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// Status and stable code for the wrapped error. A stopped session
    /// runtime surfaces as `Infrastructure`, hence 500.
    fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.classify();
        let body = ErrorBody {
            error,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
