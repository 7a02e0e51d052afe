//! Commands for the Narrative Proximity context.

use uuid::Uuid;
use wanderlore_core::command::Command;

/// Command to resolve one of the choices of the active story presentation.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The choice picked by the player.
    pub choice_id: String,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "narrative.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
