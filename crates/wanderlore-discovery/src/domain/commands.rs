//! Commands for the Procedural Discovery context.

use uuid::Uuid;
use wanderlore_core::command::Command;

/// Command to discard every live discovery and spawn a fresh batch.
#[derive(Debug, Clone)]
pub struct ReshuffleDiscoveries {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ReshuffleDiscoveries {
    fn command_type(&self) -> &'static str {
        "discovery.reshuffle"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
