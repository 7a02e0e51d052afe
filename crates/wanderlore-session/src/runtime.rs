//! The async task that owns a game session.
//!
//! Commands arrive over an mpsc channel and are applied one at a time,
//! interleaved with the tick, auto-save and weather timers. After every step
//! the runtime persists dirty state, submits a pending highscore and
//! publishes a fresh snapshot on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info, warn};
use wanderlore_core::error::DomainError;
use wanderlore_core::store::{HighscoreSink, KeyValueStore};
use wanderlore_geo::PositionUpdate;
use wanderlore_world_state::domain::weather::WeatherSource;

use crate::application::highscore::submit_highscore;
use crate::application::persistence::{clear_player_state, save_player_state};
use crate::application::query_handlers::{SessionSnapshot, session_snapshot};
use crate::domain::aggregates::GameSession;
use crate::domain::commands::SessionCommand;
use crate::domain::config::SessionConfig;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug)]
struct Envelope {
    command: SessionCommand,
    reply: Option<oneshot::Sender<SessionSnapshot>>,
}

/// Cloneable front door to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

fn stopped() -> DomainError {
    DomainError::Infrastructure("session runtime has stopped".into())
}

impl SessionHandle {
    /// Sends a command and waits for the snapshot taken after it was applied.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn send(&self, command: SessionCommand) -> Result<SessionSnapshot, DomainError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }

    /// Sends a command without waiting for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn notify(&self, command: SessionCommand) -> Result<(), DomainError> {
        self.commands
            .send(Envelope {
                command,
                reply: None,
            })
            .await
            .map_err(|_| stopped())
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Whether the runtime is gone.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

#[derive(Debug, Clone, Copy)]
struct Periods {
    tick: Duration,
    autosave: Duration,
    weather: Duration,
}

/// Owns a session and its collaborators for the lifetime of the task.
pub struct SessionRuntime {
    session: GameSession,
    store: Arc<dyn KeyValueStore>,
    highscores: Arc<dyn HighscoreSink>,
    weather: Arc<dyn WeatherSource>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionRuntime {
    /// Moves `session` into a new task and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `config` is invalid, before any
    /// task is spawned.
    pub fn spawn(
        session: GameSession,
        store: Arc<dyn KeyValueStore>,
        highscores: Arc<dyn HighscoreSink>,
        weather: Arc<dyn WeatherSource>,
        config: &SessionConfig,
    ) -> Result<(SessionHandle, JoinHandle<()>), DomainError> {
        config.validate()?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(session_snapshot(&session));
        let periods = Periods {
            tick: Duration::from_millis(config.tick_interval_ms),
            autosave: Duration::from_millis(config.autosave_interval_ms),
            weather: Duration::from_millis(config.weather_refresh_ms),
        };
        let runtime = Self {
            session,
            store,
            highscores,
            weather,
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(runtime.run(command_rx, periods));
        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        Ok((handle, task))
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Envelope>, periods: Periods) {
        let start = Instant::now();
        let mut tick = interval_at(start + periods.tick, periods.tick);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut autosave = interval_at(start + periods.autosave, periods.autosave);
        autosave.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First weather tick fires immediately.
        let mut weather = interval(periods.weather);
        weather.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("session runtime started");
        loop {
            tokio::select! {
                envelope = commands.recv() => {
                    let Some(Envelope { command, reply }) = envelope else {
                        info!("all session handles dropped");
                        self.stop().await;
                        break;
                    };
                    debug!(command = command.name(), "applying session command");
                    let shutdown = matches!(command, SessionCommand::Shutdown);
                    if shutdown {
                        self.stop().await;
                    } else {
                        self.apply(command).await;
                        self.settle().await;
                    }
                    if let Some(reply) = reply {
                        // The caller may have given up waiting.
                        let _ = reply.send(self.snapshots.borrow().clone());
                    }
                    if shutdown {
                        break;
                    }
                }
                _ = tick.tick() => {
                    self.session.tick();
                    self.settle().await;
                }
                _ = autosave.tick() => {
                    if self.session.is_paused() {
                        debug!("auto-save skipped while paused");
                    } else {
                        save_player_state(self.store.as_ref(), &self.session.state()).await;
                    }
                }
                _ = weather.tick() => {
                    self.session.refresh_weather(self.weather.as_ref()).await;
                    self.settle().await;
                }
            }
        }
        info!("session runtime stopped");
    }

    async fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Position(update) => self.session.handle_position(update),
            SessionCommand::MakeChoice(choice) => {
                self.session.make_choice(&choice);
            }
            SessionCommand::Reshuffle(reshuffle) => {
                self.session.reshuffle(&reshuffle);
            }
            SessionCommand::FinishCutscene => {
                self.session.finish_cutscene();
            }
            SessionCommand::FinishIntro => {
                self.session.finish_intro();
            }
            SessionCommand::Pause => {
                self.session.pause();
            }
            SessionCommand::Resume => {
                self.session.resume();
            }
            SessionCommand::Save => {
                save_player_state(self.store.as_ref(), &self.session.state()).await;
                self.session.take_dirty();
            }
            SessionCommand::Reset => match self.session.reset() {
                Ok(()) => {
                    clear_player_state(self.store.as_ref()).await;
                    self.session.take_dirty();
                }
                Err(e) => warn!(error = %e, "session reset failed"),
            },
            // Handled by the loop.
            SessionCommand::Shutdown => {}
        }
    }

    async fn settle(&mut self) {
        if self.session.take_dirty() {
            save_player_state(self.store.as_ref(), &self.session.state()).await;
        }
        if let Some(entry) = self.session.take_highscore() {
            submit_highscore(self.highscores.as_ref(), &entry).await;
        }
        self.snapshots
            .send_replace(session_snapshot(&self.session));
    }

    async fn stop(&mut self) {
        if let Some(entry) = self.session.take_highscore() {
            submit_highscore(self.highscores.as_ref(), &entry).await;
        }
        save_player_state(self.store.as_ref(), &self.session.state()).await;
        self.session.shutdown();
        self.snapshots
            .send_replace(session_snapshot(&self.session));
    }
}

/// Forwards every update from a position source into the session.
///
/// Stops when either side closes.
pub fn forward_positions(
    handle: SessionHandle,
    mut updates: watch::Receiver<Option<PositionUpdate>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let latest = updates.borrow_and_update().clone();
            if let Some(update) = latest {
                if handle.notify(SessionCommand::Position(update)).await.is_err() {
                    break;
                }
            }
            if updates.changed().await.is_err() {
                debug!("position source closed");
                break;
            }
        }
    })
}
