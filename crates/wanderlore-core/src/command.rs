//! Player intents routed to a single engine.

use uuid::Uuid;

/// A player intent handled by exactly one engine's command handler.
///
/// Command types are dotted as `<engine>.<action>`, e.g.
/// `narrative.make_choice`. Handlers log the type and correlation ID so a
/// request can be followed from the HTTP layer through the session runtime.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted command type, e.g. `discovery.reshuffle`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID assigned where the intent entered the system.
    fn correlation_id(&self) -> Uuid;

    /// The engine segment of [`Command::command_type`].
    fn engine(&self) -> &'static str {
        let command_type = self.command_type();
        command_type
            .split_once('.')
            .map_or(command_type, |(engine, _)| engine)
    }
}
