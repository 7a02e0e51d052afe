//! The game session: composition root of every engine.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use wanderlore_content::application::loading::Campaign;
use wanderlore_content::domain::location::LocationKind;
use wanderlore_core::aggregate::AggregateRoot;
use wanderlore_core::clock::Clock;
use wanderlore_core::error::DomainError;
use wanderlore_core::event::{EventBus, SubscriptionId};
use wanderlore_core::rng::DeterministicRng;
use wanderlore_core::store::HighscoreEntry;
use wanderlore_discovery::application::command_handlers::handle_reshuffle;
use wanderlore_discovery::domain::aggregates::DiscoveryEngine;
use wanderlore_discovery::domain::catalog::{DiscoveryCatalog, Rarity};
use wanderlore_discovery::domain::commands::ReshuffleDiscoveries;
use wanderlore_discovery::domain::events::{DiscoveryEvent, DiscoveryEventKind};
use wanderlore_geo::{GeoPosition, PositionTracker, PositionUpdate};
use wanderlore_narrative::application::command_handlers::handle_make_choice;
use wanderlore_narrative::domain::aggregates::NarrativeEngine;
use wanderlore_narrative::domain::commands::MakeChoice;
use wanderlore_narrative::domain::config::NarrativeConfig;
use wanderlore_narrative::domain::events::{NarrativeEvent, NarrativeEventKind};
use wanderlore_narrative::domain::progress::NarrativeProgress;
use wanderlore_progression::domain::aggregates::{ConsciousnessLedger, ConsciousnessState};
use wanderlore_progression::domain::curve::LevelCurve;
use wanderlore_world_state::application::command_handlers::handle_refresh_weather;
use wanderlore_world_state::domain::aggregates::WeatherState;
use wanderlore_world_state::domain::weather::WeatherSource;

use super::config::{SessionConfig, XpAwards};
use super::events::GameEvent;
use super::state::{Difficulty, PlayerProgressState};

/// Achievement for the first collected discovery.
pub const FIRST_DISCOVERY_ACHIEVEMENT: &str = "first_discovery";
/// Achievement for the first collected secret.
pub const FIRST_SECRET_ACHIEVEMENT: &str = "first_secret";
/// Achievement for collecting a legendary discovery.
pub const LEGENDARY_FIND_ACHIEVEMENT: &str = "legendary_find";

/// One player's game.
///
/// Owns every engine exclusively. Each public mutation runs to completion,
/// then the produced events are published on the bus in one batch.
pub struct GameSession {
    campaign: Arc<Campaign>,
    narrative_config: NarrativeConfig,
    level_curve: LevelCurve,
    xp_awards: XpAwards,
    difficulty: Difficulty,
    narrative: NarrativeEngine,
    discovery: DiscoveryEngine,
    ledger: ConsciousnessLedger,
    weather: WeatherState,
    tracker: PositionTracker,
    bus: EventBus<GameEvent>,
    clock: Arc<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    paused: bool,
    dirty: bool,
    highscore: Option<HighscoreEntry>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("difficulty", &self.difficulty)
            .field("narrative", &self.narrative)
            .field("discovery", &self.discovery)
            .field("ledger", &self.ledger)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Assembles a session over restored state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any config is invalid.
    pub fn new(
        campaign: Arc<Campaign>,
        config: &SessionConfig,
        state: PlayerProgressState,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let narrative_config = NarrativeConfig {
            cost_multiplier: config.narrative.cost_multiplier * state.difficulty.cost_multiplier(),
            ..config.narrative.clone()
        };
        let narrative =
            NarrativeEngine::new(Arc::clone(&campaign), narrative_config.clone(), state.narrative)?;
        let ledger = ConsciousnessLedger::new(config.level_curve.clone(), state.consciousness)?;
        let discovery = DiscoveryEngine::new(config.discovery.clone(), DiscoveryCatalog::default())?;
        let refresh_ms = i64::try_from(config.weather_refresh_ms).unwrap_or(i64::MAX);

        info!(
            difficulty = state.difficulty.as_str(),
            locations = campaign.registry.len(),
            "game session assembled"
        );
        Ok(Self {
            campaign,
            narrative_config,
            level_curve: config.level_curve.clone(),
            xp_awards: config.xp_awards.clone(),
            difficulty: state.difficulty,
            narrative,
            discovery,
            ledger,
            weather: WeatherState::new(Duration::milliseconds(refresh_ms)),
            tracker: PositionTracker::new(config.fallback_position),
            bus: EventBus::new(),
            clock,
            rng,
            paused: false,
            dirty: false,
            highscore: None,
        })
    }

    /// Registers an event handler.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.bus.subscribe(handler)
    }

    /// Removes an event handler.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Ingests a position update and, unless paused, evaluates both engines
    /// at the resulting position.
    pub fn handle_position(&mut self, update: PositionUpdate) {
        let outcome = self.tracker.ingest(update);
        let mut produced = Vec::new();
        if let Some(advisory) = outcome.advisory {
            produced.push(GameEvent::PositionAdvisory(advisory));
        }
        if let Some(position) = outcome.position {
            if self.paused {
                debug!("session paused, position recorded without evaluation");
            } else {
                self.run_engines(&position);
            }
        }
        self.commit(produced);
    }

    /// Re-evaluates both engines at the current position. Does nothing while
    /// paused or before the first position.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(position) = self.tracker.current() else {
            return;
        };
        self.run_engines(&position);
        self.commit(Vec::new());
    }

    fn run_engines(&mut self, position: &GeoPosition) {
        self.narrative.evaluate(position, self.clock.as_ref());
        if self.narrative.is_game_over() {
            return;
        }
        self.discovery
            .tick(position, self.clock.as_ref(), self.rng.as_mut());
    }

    /// Resolves a choice on the active story presentation.
    pub fn make_choice(&mut self, command: &MakeChoice) -> bool {
        let applied = handle_make_choice(
            command,
            &mut self.narrative,
            self.weather.modifiers(),
            self.clock.as_ref(),
        );
        self.commit(Vec::new());
        applied
    }

    /// Replaces the live discoveries with a fresh batch. Does nothing once
    /// the game is over.
    pub fn reshuffle(&mut self, command: &ReshuffleDiscoveries) -> usize {
        if self.narrative.is_game_over() {
            debug!("game over, reshuffle ignored");
            return 0;
        }
        let spawned = handle_reshuffle(
            command,
            &mut self.discovery,
            self.clock.as_ref(),
            self.rng.as_mut(),
        );
        self.commit(Vec::new());
        spawned
    }

    /// Leaves the cutscene screen.
    pub fn finish_cutscene(&mut self) -> bool {
        self.narrative.finish_cutscene()
    }

    /// Leaves the character intro.
    pub fn finish_intro(&mut self) -> bool {
        self.narrative.finish_intro()
    }

    /// Freezes evaluation. Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        info!("session paused");
        true
    }

    /// Unfreezes evaluation. Returns `false` if not paused.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        info!("session resumed");
        true
    }

    /// Fetches fresh weather modifiers if a refresh is due.
    pub async fn refresh_weather(&mut self, source: &dyn WeatherSource) -> bool {
        let attempted = handle_refresh_weather(&mut self.weather, source, self.clock.as_ref()).await;
        self.commit(Vec::new());
        attempted
    }

    /// Restores the default player state, keeping the difficulty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if an engine cannot be rebuilt.
    pub fn reset(&mut self) -> Result<(), DomainError> {
        self.narrative = NarrativeEngine::new(
            Arc::clone(&self.campaign),
            self.narrative_config.clone(),
            NarrativeProgress::default(),
        )?;
        self.ledger = ConsciousnessLedger::new(self.level_curve.clone(), ConsciousnessState::default())?;
        self.highscore = None;
        self.dirty = true;
        info!("player state reset");
        Ok(())
    }

    /// Cancels deferred work and drops every subscriber.
    pub fn shutdown(&mut self) {
        self.discovery.cancel_respawns();
        self.bus.clear();
        info!("game session torn down");
    }

    fn commit(&mut self, mut produced: Vec<GameEvent>) {
        let clock = Arc::clone(&self.clock);

        let narrative_events = self.narrative.take_uncommitted_events();
        for event in &narrative_events {
            self.reward_narrative(event, clock.as_ref());
        }
        let discovery_events = self.discovery.take_uncommitted_events();
        for event in &discovery_events {
            self.reward_discovery(event, clock.as_ref());
        }

        produced.extend(narrative_events.into_iter().map(GameEvent::Narrative));
        produced.extend(discovery_events.into_iter().map(GameEvent::Discovery));
        produced.extend(
            self.ledger
                .take_uncommitted_events()
                .into_iter()
                .map(GameEvent::Progression),
        );
        produced.extend(
            self.weather
                .take_uncommitted_events()
                .into_iter()
                .map(GameEvent::WorldState),
        );
        if produced.is_empty() {
            return;
        }

        self.dirty = true;
        for event in &produced {
            self.bus.publish(event);
        }
    }

    fn reward_narrative(&mut self, event: &NarrativeEvent, clock: &dyn Clock) {
        match &event.kind {
            NarrativeEventKind::LocationTriggered(trigger) if trigger.kind == LocationKind::Story => {
                self.ledger.award_xp(
                    self.xp_awards.story_visited,
                    &format!("story:{}", trigger.location_id),
                    clock,
                );
                self.ledger
                    .unlock_lore(&format!("lore_{}", trigger.location_id), clock);
            }
            NarrativeEventKind::SecretCollected { location_id, .. } => {
                self.ledger.award_xp(
                    self.xp_awards.secret_found,
                    &format!("secret:{location_id}"),
                    clock,
                );
                self.ledger
                    .unlock_achievement(FIRST_SECRET_ACHIEVEMENT, None, clock);
            }
            NarrativeEventKind::ChoiceResolved { choice_id, .. } => {
                self.ledger.award_xp(
                    self.xp_awards.choice_resolved,
                    &format!("choice:{choice_id}"),
                    clock,
                );
            }
            NarrativeEventKind::StageAdvanced { to, .. } => {
                self.ledger
                    .award_xp(self.xp_awards.stage_advanced, &format!("stage:{to}"), clock);
                self.ledger
                    .unlock_achievement(&format!("stage_{to}"), None, clock);
            }
            NarrativeEventKind::GameOver { .. } => {
                self.discovery.cancel_respawns();
                self.highscore = Some(self.highscore_entry());
            }
            _ => {}
        }
    }

    fn reward_discovery(&mut self, event: &DiscoveryEvent, clock: &dyn Clock) {
        if let DiscoveryEventKind::DiscoveryCollected {
            type_name,
            rarity,
            xp_value,
            ..
        } = &event.kind
        {
            self.ledger
                .award_xp(*xp_value, &format!("discovery:{type_name}"), clock);
            self.ledger
                .unlock_achievement(FIRST_DISCOVERY_ACHIEVEMENT, None, clock);
            if *rarity == Rarity::Legendary {
                self.ledger
                    .unlock_achievement(LEGENDARY_FIND_ACHIEVEMENT, None, clock);
            }
        }
    }

    fn highscore_entry(&self) -> HighscoreEntry {
        let progress = self.narrative.progress();
        HighscoreEntry {
            stages_completed: progress.stage.ordinal(),
            artifacts_found: u32::try_from(progress.discovered_secrets.len()).unwrap_or(u32::MAX),
            final_health: progress.health,
            final_sanity: progress.sanity,
            difficulty: self.difficulty.as_str().to_owned(),
        }
    }

    /// The persisted slice of the session.
    #[must_use]
    pub fn state(&self) -> PlayerProgressState {
        PlayerProgressState {
            narrative: self.narrative.progress().clone(),
            difficulty: self.difficulty,
            consciousness: self.ledger.state().clone(),
        }
    }

    /// Whether state changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// The highscore of a game that just ended, handed out once.
    pub fn take_highscore(&mut self) -> Option<HighscoreEntry> {
        self.highscore.take()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn position(&self) -> Option<GeoPosition> {
        self.tracker.current()
    }

    #[must_use]
    pub fn is_using_fallback(&self) -> bool {
        self.tracker.is_using_fallback()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    #[must_use]
    pub fn narrative(&self) -> &NarrativeEngine {
        &self.narrative
    }

    #[must_use]
    pub fn discovery(&self) -> &DiscoveryEngine {
        &self.discovery
    }

    #[must_use]
    pub fn ledger(&self) -> &ConsciousnessLedger {
        &self.ledger
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }
}
