//! Highscore submission at game over.

use tracing::{info, warn};
use wanderlore_core::store::{HighscoreEntry, HighscoreSink};

/// Submits a finished session's score. Failures are logged and dropped.
pub async fn submit_highscore(sink: &dyn HighscoreSink, entry: &HighscoreEntry) -> bool {
    match sink.submit(entry).await {
        Ok(()) => {
            info!(
                stages_completed = entry.stages_completed,
                artifacts_found = entry.artifacts_found,
                difficulty = %entry.difficulty,
                "highscore submitted"
            );
            true
        }
        Err(e) => {
            warn!(error = %e, "highscore submission failed");
            false
        }
    }
}
