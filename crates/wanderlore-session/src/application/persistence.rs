//! Loading and saving the player state through the key-value port.
//!
//! Storage failures and unreadable snapshots are logged and absorbed. The
//! game always starts, falling back to a fresh state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wanderlore_core::store::KeyValueStore;

use crate::domain::state::{Difficulty, PlayerProgressState};

/// Key the player state is stored under.
pub const PLAYER_STATE_KEY: &str = "wanderlore.player_state";

/// Version written into every snapshot. Snapshots of another version are
/// discarded on load.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedPlayerState {
    schema_version: u32,
    #[serde(flatten)]
    state: PlayerProgressState,
}

/// Restores the saved state, or a fresh one on `difficulty`.
pub async fn load_player_state(
    store: &dyn KeyValueStore,
    difficulty: Difficulty,
) -> PlayerProgressState {
    let value = match store.load(PLAYER_STATE_KEY).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!("no saved player state, starting fresh");
            return PlayerProgressState::new(difficulty);
        }
        Err(e) => {
            warn!(error = %e, "player state load failed, starting fresh");
            return PlayerProgressState::new(difficulty);
        }
    };

    match serde_json::from_value::<SavedPlayerState>(value) {
        Ok(saved) if saved.schema_version == SCHEMA_VERSION => {
            info!(stage = %saved.state.narrative.stage, "player state restored");
            saved.state
        }
        Ok(saved) => {
            warn!(
                found = saved.schema_version,
                expected = SCHEMA_VERSION,
                "saved player state has another schema version, starting fresh"
            );
            PlayerProgressState::new(difficulty)
        }
        Err(e) => {
            warn!(error = %e, "saved player state is unreadable, starting fresh");
            PlayerProgressState::new(difficulty)
        }
    }
}

/// Writes the whole state. Returns whether the write succeeded.
pub async fn save_player_state(store: &dyn KeyValueStore, state: &PlayerProgressState) -> bool {
    let saved = SavedPlayerState {
        schema_version: SCHEMA_VERSION,
        state: state.clone(),
    };
    let value = serde_json::to_value(&saved).expect("player state serialization is infallible");
    match store.save(PLAYER_STATE_KEY, &value).await {
        Ok(()) => {
            debug!("player state saved");
            true
        }
        Err(e) => {
            warn!(error = %e, "player state save failed");
            false
        }
    }
}

/// Deletes the saved state. Returns whether the delete succeeded.
pub async fn clear_player_state(store: &dyn KeyValueStore) -> bool {
    match store.remove(PLAYER_STATE_KEY).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "player state delete failed");
            false
        }
    }
}
