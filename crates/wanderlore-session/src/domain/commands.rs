//! Commands accepted by a running session.

use wanderlore_discovery::domain::commands::ReshuffleDiscoveries;
use wanderlore_geo::PositionUpdate;
use wanderlore_narrative::domain::commands::MakeChoice;

/// One input to the session runtime. Each is processed to completion before
/// the next is accepted.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// A raw update from the position source.
    Position(PositionUpdate),
    /// Resolves a choice on the active story.
    MakeChoice(MakeChoice),
    /// Replaces the live discoveries.
    Reshuffle(ReshuffleDiscoveries),
    /// Dismisses the cutscene screen.
    FinishCutscene,
    /// Dismisses the character intro.
    FinishIntro,
    /// Freezes ticks, auto-save and evaluation; positions are still recorded.
    Pause,
    /// Lifts a pause.
    Resume,
    /// Persists the current state immediately.
    Save,
    /// Restores the default player state and clears the saved snapshot.
    Reset,
    /// Saves, cancels every deferred task and stops the runtime.
    Shutdown,
}

impl SessionCommand {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position(_) => "position",
            Self::MakeChoice(_) => "make_choice",
            Self::Reshuffle(_) => "reshuffle",
            Self::FinishCutscene => "finish_cutscene",
            Self::FinishIntro => "finish_intro",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Save => "save",
            Self::Reset => "reset",
            Self::Shutdown => "shutdown",
        }
    }
}
