//! Shared application state.

use std::sync::Arc;

use wanderlore_content::application::loading::Campaign;
use wanderlore_session::runtime::SessionHandle;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Front door to the running game session.
    pub session: SessionHandle,
    /// The loaded campaign, for read-only location queries.
    pub campaign: Arc<Campaign>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(session: SessionHandle, campaign: Arc<Campaign>) -> Self {
        Self { session, campaign }
    }
}
