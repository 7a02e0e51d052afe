//! Aggregate roots for the Narrative Proximity context.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use wanderlore_content::application::loading::Campaign;
use wanderlore_content::domain::choices::{Choice, Vital};
use wanderlore_content::domain::location::{LocationKind, NarrativeLocation};
use wanderlore_core::aggregate::AggregateRoot;
use wanderlore_core::clock::Clock;
use wanderlore_core::error::DomainError;
use wanderlore_geo::{CompassDirection, GeoPosition, Located, bearing_to_compass, measure, nearest};
use wanderlore_world_state::domain::weather::WeatherModifiers;

use super::config::NarrativeConfig;
use super::events::{NarrativeEvent, NarrativeEventKind, TriggerEvent};
use super::progress::{NarrativeProgress, apply_delta};
use super::screen::{GameOverCause, ScreenMode};

/// A triggered story or secret shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// The triggering location.
    pub location_id: String,
    /// Its display name.
    pub name: String,
    /// `Story` or `Secret`.
    pub kind: LocationKind,
    /// Narrative text of the location.
    pub text: Option<String>,
    /// Offered choices; empty for informational presentations.
    pub choices: Vec<Choice>,
}

impl Presentation {
    /// Whether the presentation blocks until `make_choice` is called.
    #[must_use]
    pub fn awaits_choice(&self) -> bool {
        self.kind == LocationKind::Story && !self.choices.is_empty()
    }
}

/// Distance and direction to the nearest hintable location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityHint {
    /// The hinted location.
    pub location_id: String,
    /// Its display name.
    pub name: String,
    /// Distance from the player.
    pub distance_meters: f64,
    /// Compass label from the player towards the location.
    pub direction: CompassDirection,
}

/// The narrative proximity engine.
///
/// Owns the narrative slice of the player state. Every mutation goes through
/// a method here and leaves its trace in the uncommitted event buffer.
#[derive(Debug)]
pub struct NarrativeEngine {
    campaign: Arc<Campaign>,
    config: NarrativeConfig,
    progress: NarrativeProgress,
    screen: ScreenMode,
    narrative_text: Option<String>,
    active: Option<Presentation>,
    pending: VecDeque<Presentation>,
    inside_cutscenes: HashSet<String>,
    uncommitted_events: Vec<NarrativeEvent>,
}

impl NarrativeEngine {
    /// Creates an engine over restored progress. Depleted vitals restore
    /// straight into the game-over screen without emitting an event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the config is invalid.
    pub fn new(
        campaign: Arc<Campaign>,
        config: NarrativeConfig,
        mut progress: NarrativeProgress,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        progress.health = apply_delta(progress.health, 0);
        progress.sanity = apply_delta(progress.sanity, 0);
        let screen = match depletion_cause(&progress) {
            Some(cause) => ScreenMode::GameOver(cause),
            None => ScreenMode::Map,
        };
        Ok(Self {
            campaign,
            config,
            progress,
            screen,
            narrative_text: None,
            active: None,
            pending: VecDeque::new(),
            inside_cutscenes: HashSet::new(),
            uncommitted_events: Vec::new(),
        })
    }

    /// The narrative slice of the player state.
    #[must_use]
    pub fn progress(&self) -> &NarrativeProgress {
        &self.progress
    }

    /// The current screen mode.
    #[must_use]
    pub fn screen(&self) -> &ScreenMode {
        &self.screen
    }

    /// The most recent narrative text.
    #[must_use]
    pub fn narrative_text(&self) -> Option<&str> {
        self.narrative_text.as_deref()
    }

    /// The presentation currently shown, if any.
    #[must_use]
    pub fn active_presentation(&self) -> Option<&Presentation> {
        self.active.as_ref()
    }

    /// Presentations waiting for a later tick.
    #[must_use]
    pub fn pending_presentations(&self) -> usize {
        self.pending.len()
    }

    /// Whether the terminal state has been reached.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.screen.is_game_over()
    }

    /// The campaign being played.
    #[must_use]
    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// Evaluates every eligible geofence against `position`.
    ///
    /// Locations are processed in registry order and all qualifying triggers
    /// fire in the same call. At most one presentation is promoted per call.
    pub fn evaluate(&mut self, position: &GeoPosition, clock: &dyn Clock) -> Vec<TriggerEvent> {
        if self.is_game_over() {
            debug!("game over, skipping proximity evaluation");
            return Vec::new();
        }
        let now = clock.now();
        self.retire_informational(now);

        let campaign = Arc::clone(&self.campaign);
        let visited = &self.progress.visited_locations;
        let proximities = measure(
            position,
            campaign
                .registry
                .locations()
                .iter()
                .filter(|location| location.kind.is_retriggerable() || !visited.contains(&location.id)),
        );

        let mut triggers = Vec::new();
        for proximity in proximities {
            let location = proximity.item;
            let inside = proximity.is_within(location.trigger_radius_meters);
            if location.kind == LocationKind::Cutscene {
                if !inside {
                    self.inside_cutscenes.remove(&location.id);
                    continue;
                }
                if !self.inside_cutscenes.insert(location.id.clone()) {
                    continue;
                }
            } else if !inside {
                continue;
            }
            debug!(
                location_id = %location.id,
                distance_meters = proximity.distance_meters,
                "geofence entered"
            );
            triggers.push(self.apply_trigger(location, now));
        }

        self.promote_next(now);
        triggers
    }

    fn apply_trigger(&mut self, location: &NarrativeLocation, now: DateTime<Utc>) -> TriggerEvent {
        let trigger = TriggerEvent {
            location_id: location.id.clone(),
            kind: location.kind,
        };
        self.record(now, NarrativeEventKind::LocationTriggered(trigger.clone()));

        match location.kind {
            LocationKind::Story => {
                self.progress.visited_locations.insert(location.id.clone());
                self.narrative_text.clone_from(&location.narrative_text);
                self.pending.push_back(Presentation {
                    location_id: location.id.clone(),
                    name: location.name.clone(),
                    kind: location.kind,
                    text: location.narrative_text.clone(),
                    choices: self.campaign.choices.for_stage(location.stage).to_vec(),
                });
                info!(location_id = %location.id, "story location visited");
            }
            LocationKind::Secret => {
                self.progress.visited_locations.insert(location.id.clone());
                if self.progress.discovered_secrets.insert(location.id.clone()) {
                    if let Some(item) = &location.reward_item_id {
                        self.progress.inventory_items.push(item.clone());
                    }
                    self.record(
                        now,
                        NarrativeEventKind::SecretCollected {
                            location_id: location.id.clone(),
                            reward_item_id: location.reward_item_id.clone(),
                        },
                    );
                    self.pending.push_back(Presentation {
                        location_id: location.id.clone(),
                        name: location.name.clone(),
                        kind: location.kind,
                        text: location.narrative_text.clone(),
                        choices: Vec::new(),
                    });
                    info!(location_id = %location.id, "secret collected");
                } else {
                    debug!(location_id = %location.id, "secret already collected");
                }
            }
            LocationKind::Cutscene => {
                let payload = location
                    .cutscene_payload
                    .clone()
                    .unwrap_or(serde_json::Value::Null);
                self.screen = ScreenMode::Cutscene(payload);
            }
            LocationKind::Startgame => {
                self.progress.visited_locations.insert(location.id.clone());
                self.screen = ScreenMode::CharacterIntro;
            }
        }
        trigger
    }

    fn retire_informational(&mut self, now: DateTime<Utc>) {
        let Some(retired) = self.active.take_if(|p| !p.awaits_choice()) else {
            return;
        };
        if retired.kind == LocationKind::Story {
            self.advance_stages(now);
        }
    }

    fn promote_next(&mut self, now: DateTime<Utc>) {
        if self.active.is_some() {
            return;
        }
        if let Some(next) = self.pending.pop_front() {
            self.record(
                now,
                NarrativeEventKind::ChoicesPresented {
                    location_id: next.location_id.clone(),
                    choice_ids: next.choices.iter().map(|c| c.id.clone()).collect(),
                },
            );
            self.active = Some(next);
        }
    }

    /// Resolves `choice_id` against the active story presentation.
    ///
    /// Returns `false` without side effects when nothing awaits a choice or
    /// the id is not offered.
    pub fn make_choice(
        &mut self,
        choice_id: &str,
        weather: &WeatherModifiers,
        clock: &dyn Clock,
    ) -> bool {
        if self.is_game_over() {
            debug!(choice_id, "game over, ignoring choice");
            return false;
        }
        let Some(active) = self.active.as_ref().filter(|p| p.awaits_choice()) else {
            debug!(choice_id, "no active choice set, ignoring choice");
            return false;
        };
        let Some(choice) = active.choices.iter().find(|c| c.id == choice_id).cloned() else {
            debug!(choice_id, "choice is not offered, ignoring");
            return false;
        };
        let location_id = active.location_id.clone();
        self.active = None;

        let now = clock.now();
        let applied_cost = self.scaled_cost(&choice, weather);
        self.narrative_text = Some(match &weather.narrative_modifier {
            Some(flavor) => format!("{}\n\n{flavor}", choice.outcome),
            None => choice.outcome.clone(),
        });
        self.record(
            now,
            NarrativeEventKind::ChoiceResolved {
                location_id,
                choice_id: choice.id.clone(),
                affects: choice.affects,
                applied_cost,
                outcome: choice.outcome.clone(),
            },
        );
        self.apply_vital(choice.affects, applied_cost.saturating_neg(), now);
        if !self.is_game_over() {
            self.advance_stages(now);
        }
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn scaled_cost(&self, choice: &Choice, weather: &WeatherModifiers) -> i32 {
        let mut factor = self.config.cost_multiplier * weather.difficulty_modifier;
        if choice.affects == Vital::Sanity {
            factor *= weather.sanity_modifier;
        }
        (f64::from(choice.cost) * factor).round() as i32
    }

    /// Changes a vital by `delta`, clamped to `0..=100`, then checks for
    /// game over. No-op once the game is over.
    pub fn adjust_vital(&mut self, vital: Vital, delta: i32, clock: &dyn Clock) {
        if self.is_game_over() {
            return;
        }
        self.apply_vital(vital, delta, clock.now());
    }

    fn apply_vital(&mut self, vital: Vital, delta: i32, now: DateTime<Utc>) {
        match vital {
            Vital::Health => self.progress.health = apply_delta(self.progress.health, delta),
            Vital::Sanity => self.progress.sanity = apply_delta(self.progress.sanity, delta),
        }
        self.check_game_over(now);
    }

    fn check_game_over(&mut self, now: DateTime<Utc>) {
        if self.is_game_over() {
            return;
        }
        let Some(cause) = depletion_cause(&self.progress) else {
            return;
        };
        info!(
            ?cause,
            health = self.progress.health,
            sanity = self.progress.sanity,
            "game over"
        );
        self.screen = ScreenMode::GameOver(cause);
        self.active = None;
        self.pending.clear();
        self.record(now, NarrativeEventKind::GameOver { cause });
    }

    fn advance_stages(&mut self, now: DateTime<Utc>) {
        while let Some(next) = self.progress.stage.next() {
            let stage = self.progress.stage;
            let complete = self
                .campaign
                .registry
                .story_locations_for(stage)
                .all(|location| self.progress.visited_locations.contains(&location.id));
            if !complete {
                break;
            }
            self.progress.stage = next;
            info!(from = %stage, to = %next, "stage advanced");
            self.record(now, NarrativeEventKind::StageAdvanced { from: stage, to: next });
        }
    }

    /// Leaves the cutscene screen. Returns `false` if no cutscene is showing.
    pub fn finish_cutscene(&mut self) -> bool {
        if matches!(self.screen, ScreenMode::Cutscene(_)) {
            self.screen = ScreenMode::Map;
            true
        } else {
            false
        }
    }

    /// Leaves the character intro. Returns `false` if it is not showing.
    pub fn finish_intro(&mut self) -> bool {
        if self.screen == ScreenMode::CharacterIntro {
            self.screen = ScreenMode::Map;
            true
        } else {
            false
        }
    }

    /// The nearest unvisited, non-cutscene location. Secrets stay hidden
    /// until the player is within the reveal radius, scaled by visibility.
    #[must_use]
    pub fn nearest_hint(
        &self,
        position: &GeoPosition,
        weather: &WeatherModifiers,
    ) -> Option<ProximityHint> {
        let reveal_radius = self.config.hint_reveal_radius_meters * weather.visibility_range;
        let visited = &self.progress.visited_locations;
        let candidates = self
            .campaign
            .registry
            .locations()
            .iter()
            .filter(|l| !l.kind.is_retriggerable() && !visited.contains(&l.id));

        nearest(position, candidates, usize::MAX)
            .into_iter()
            .find(|p| p.item.kind != LocationKind::Secret || p.is_within(reveal_radius))
            .map(|p| ProximityHint {
                location_id: p.item.id.clone(),
                name: p.item.name.clone(),
                distance_meters: p.distance_meters,
                direction: bearing_to_compass(position, &p.item.location()),
            })
    }

    fn record(&mut self, occurred_at: DateTime<Utc>, kind: NarrativeEventKind) {
        self.uncommitted_events.push(NarrativeEvent { occurred_at, kind });
    }
}

fn depletion_cause(progress: &NarrativeProgress) -> Option<GameOverCause> {
    if progress.health == 0 {
        Some(GameOverCause::HealthDepleted)
    } else if progress.sanity == 0 {
        Some(GameOverCause::SanityDepleted)
    } else {
        None
    }
}

impl AggregateRoot for NarrativeEngine {
    type Event = NarrativeEvent;

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wanderlore_content::domain::choices::{StageChoiceSet, StageChoices};
    use wanderlore_content::domain::location::StageId;
    use wanderlore_content::domain::registry::LocationRegistry;
    use wanderlore_core::event::DomainEvent;
    use wanderlore_geo::destination_point;
    use wanderlore_test_support::FixedClock;

    const MAP_LAT: f64 = 61.4728;
    const MAP_LNG: f64 = 23.7261;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn location(id: &str, kind: LocationKind, lat: f64, lng: f64, radius: f64, stage: StageId) -> NarrativeLocation {
        NarrativeLocation {
            id: id.to_owned(),
            name: id.replace('_', " "),
            kind,
            lat,
            lng,
            trigger_radius_meters: radius,
            stage,
            narrative_text: Some(format!("{id} text")),
            reward_item_id: None,
            cutscene_payload: None,
        }
    }

    fn choice(id: &str, affects: Vital, cost: i32) -> Choice {
        Choice {
            id: id.to_owned(),
            text: id.to_owned(),
            affects,
            cost,
            outcome: format!("{id} outcome"),
        }
    }

    fn campaign(locations: Vec<NarrativeLocation>) -> Arc<Campaign> {
        let choices = StageChoices::new(vec![
            StageChoiceSet {
                stage: StageId::Start,
                choices: vec![choice("brave", Vital::Health, 20), choice("study", Vital::Sanity, 10)],
            },
            StageChoiceSet {
                stage: StageId::One,
                choices: vec![choice("pray", Vital::Sanity, -5)],
            },
        ])
        .unwrap();
        Arc::new(Campaign {
            registry: LocationRegistry::new(locations).unwrap(),
            choices,
        })
    }

    fn tampere_campaign() -> Arc<Campaign> {
        let mut compass = location("hidden_compass", LocationKind::Secret, 61.4752, 23.7309, 25.0, StageId::Start);
        compass.reward_item_id = Some("rusted_compass".to_owned());
        let mut veil = location("veil_tear", LocationKind::Cutscene, 61.4990, 23.7500, 30.0, StageId::One);
        veil.cutscene_payload = Some(serde_json::json!({"scene": "veil"}));
        campaign(vec![
            location("awakening", LocationKind::Startgame, 61.4978, 23.7610, 40.0, StageId::Start),
            location("ancient_map", LocationKind::Story, MAP_LAT, MAP_LNG, 50.0, StageId::Start),
            compass,
            location("old_church", LocationKind::Story, 61.4952, 23.7672, 45.0, StageId::One),
            veil,
        ])
    }

    fn engine(progress: NarrativeProgress) -> NarrativeEngine {
        NarrativeEngine::new(tampere_campaign(), NarrativeConfig::default(), progress).unwrap()
    }

    fn at(lat: f64, lng: f64) -> GeoPosition {
        GeoPosition::new(lat, lng)
    }

    fn count_of(engine: &NarrativeEngine, event_type: &str) -> usize {
        engine
            .uncommitted_events()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    #[test]
    fn test_story_location_triggers_once() {
        // Arrange
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let player = at(MAP_LAT, MAP_LNG);

        // Act
        let first = engine.evaluate(&player, &clock);
        let second = engine.evaluate(&player, &clock);

        // Assert
        assert_eq!(
            first,
            vec![TriggerEvent {
                location_id: "ancient_map".to_owned(),
                kind: LocationKind::Story,
            }]
        );
        assert!(second.is_empty());
        assert!(engine.progress().visited_locations.contains("ancient_map"));
        assert_eq!(engine.narrative_text(), Some("ancient_map text"));
        let active = engine.active_presentation().unwrap();
        assert_eq!(active.location_id, "ancient_map");
        assert_eq!(active.choices.len(), 2);
        assert_eq!(count_of(&engine, "narrative.choices_presented"), 1);
    }

    #[test]
    fn test_outside_radius_does_not_trigger() {
        let mut engine = engine(NarrativeProgress::default());
        let player = destination_point(&at(MAP_LAT, MAP_LNG), 51.0, 90.0);

        assert!(engine.evaluate(&player, &fixed_clock()).is_empty());
        assert!(engine.progress().visited_locations.is_empty());
    }

    #[test]
    fn test_secret_collects_reward_once_and_clears_next_tick() {
        // Arrange
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let player = at(61.4752, 23.7309);

        // Act
        let first = engine.evaluate(&player, &clock);
        let second = engine.evaluate(&player, &clock);

        // Assert
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(engine.progress().inventory_items, vec!["rusted_compass".to_owned()]);
        assert!(engine.progress().discovered_secrets.contains("hidden_compass"));
        assert_eq!(count_of(&engine, "narrative.secret_collected"), 1);
        assert!(engine.active_presentation().is_none());
    }

    #[test]
    fn test_choice_into_zero_health_is_game_over_exactly_once() {
        // Arrange
        let progress = NarrativeProgress {
            health: 15,
            ..NarrativeProgress::default()
        };
        let mut engine = engine(progress);
        let clock = fixed_clock();
        engine.evaluate(&at(MAP_LAT, MAP_LNG), &clock);

        // Act
        let applied = engine.make_choice("brave", &WeatherModifiers::neutral(), &clock);
        engine.adjust_vital(Vital::Health, -10, &clock);
        engine.evaluate(&at(61.4752, 23.7309), &clock);

        // Assert
        assert!(applied);
        assert_eq!(engine.progress().health, 0);
        assert_eq!(*engine.screen(), ScreenMode::GameOver(GameOverCause::HealthDepleted));
        assert_eq!(count_of(&engine, "narrative.game_over"), 1);
        assert!(!engine.make_choice("study", &WeatherModifiers::neutral(), &clock));
        assert!(engine.progress().discovered_secrets.is_empty());
    }

    #[test]
    fn test_choice_without_active_presentation_is_ignored() {
        let mut engine = engine(NarrativeProgress::default());

        let applied = engine.make_choice("brave", &WeatherModifiers::neutral(), &fixed_clock());

        assert!(!applied);
        assert!(engine.uncommitted_events().is_empty());
        assert_eq!(engine.progress().health, 100);
    }

    #[test]
    fn test_unknown_choice_keeps_presentation_active() {
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        engine.evaluate(&at(MAP_LAT, MAP_LNG), &clock);

        assert!(!engine.make_choice("flee", &WeatherModifiers::neutral(), &clock));
        assert!(engine.active_presentation().is_some());
    }

    #[test]
    fn test_completing_stage_stories_advances_stage() {
        // Arrange
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        engine.evaluate(&at(MAP_LAT, MAP_LNG), &clock);

        // Act
        engine.make_choice("study", &WeatherModifiers::neutral(), &clock);

        // Assert
        assert_eq!(engine.progress().stage, StageId::One);
        assert_eq!(engine.progress().sanity, 90);
        assert_eq!(engine.narrative_text(), Some("study outcome"));
        let advanced: Vec<_> = engine
            .uncommitted_events()
            .iter()
            .filter_map(|e| match &e.kind {
                NarrativeEventKind::StageAdvanced { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(advanced, vec![(StageId::Start, StageId::One)]);
    }

    #[test]
    fn test_stage_cascades_through_stages_without_stories_and_never_regresses() {
        // Arrange
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let neutral = WeatherModifiers::neutral();
        let mut observed = vec![engine.progress().stage];

        // Act
        engine.evaluate(&at(MAP_LAT, MAP_LNG), &clock);
        engine.make_choice("study", &neutral, &clock);
        observed.push(engine.progress().stage);
        engine.evaluate(&at(61.4952, 23.7672), &clock);
        engine.make_choice("pray", &neutral, &clock);
        observed.push(engine.progress().stage);
        engine.make_choice("pray", &neutral, &clock);
        observed.push(engine.progress().stage);

        // Assert
        assert_eq!(engine.progress().stage, StageId::Final);
        assert!(observed.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(count_of(&engine, "narrative.stage_advanced"), 4);
        assert_eq!(engine.progress().sanity, 95);
    }

    #[test]
    fn test_weather_modifiers_scale_choice_cost() {
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let stormy = WeatherModifiers {
            difficulty_modifier: 1.5,
            sanity_modifier: 2.0,
            narrative_modifier: Some("Rain hammers the stones.".to_owned()),
            ..WeatherModifiers::neutral()
        };
        engine.evaluate(&at(MAP_LAT, MAP_LNG), &clock);

        engine.make_choice("study", &stormy, &clock);

        assert_eq!(engine.progress().sanity, 70);
        assert_eq!(
            engine.narrative_text(),
            Some("study outcome\n\nRain hammers the stones.")
        );
    }

    #[test]
    fn test_vitals_stay_clamped_under_any_mutation_sequence() {
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();

        for delta in [-30, 80, -10, 200, -99, 1_000, -5, i32::MAX, -50] {
            engine.adjust_vital(Vital::Health, delta, &clock);
            engine.adjust_vital(Vital::Sanity, delta / 2, &clock);
            assert!(engine.progress().health <= 100);
            assert!(engine.progress().sanity <= 100);
        }
        assert_eq!(engine.progress().health, 50);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_cutscene_retriggers_only_after_leaving_radius() {
        // Arrange
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let inside = at(61.4990, 23.7500);
        let outside = destination_point(&inside, 200.0, 0.0);

        // Act
        let entered = engine.evaluate(&inside, &clock);
        let lingering = engine.evaluate(&inside, &clock);
        engine.evaluate(&outside, &clock);
        let reentered = engine.evaluate(&inside, &clock);

        // Assert
        assert_eq!(entered.len(), 1);
        assert!(lingering.is_empty());
        assert_eq!(reentered.len(), 1);
        assert!(!engine.progress().visited_locations.contains("veil_tear"));
        assert_eq!(
            *engine.screen(),
            ScreenMode::Cutscene(serde_json::json!({"scene": "veil"}))
        );
        assert!(engine.finish_cutscene());
        assert_eq!(*engine.screen(), ScreenMode::Map);
        assert!(!engine.finish_cutscene());
    }

    #[test]
    fn test_simultaneous_triggers_queue_presentations() {
        // Arrange
        let mut secret = location("b_secret", LocationKind::Secret, MAP_LAT, MAP_LNG, 30.0, StageId::Start);
        secret.reward_item_id = Some("lens".to_owned());
        let campaign = campaign(vec![
            location("a_story", LocationKind::Story, MAP_LAT, MAP_LNG, 30.0, StageId::Start),
            secret,
        ]);
        let mut engine = NarrativeEngine::new(campaign, NarrativeConfig::default(), NarrativeProgress::default()).unwrap();
        let clock = fixed_clock();
        let player = at(MAP_LAT, MAP_LNG);

        // Act
        let triggers = engine.evaluate(&player, &clock);
        engine.evaluate(&player, &clock);
        let still_blocked = engine.active_presentation().map(|p| p.location_id.clone());
        engine.make_choice("brave", &WeatherModifiers::neutral(), &clock);
        engine.evaluate(&player, &clock);

        // Assert
        let ids: Vec<_> = triggers.iter().map(|t| t.location_id.as_str()).collect();
        assert_eq!(ids, ["a_story", "b_secret"]);
        assert_eq!(still_blocked.as_deref(), Some("a_story"));
        assert_eq!(engine.active_presentation().unwrap().location_id, "b_secret");
        assert_eq!(engine.pending_presentations(), 0);
    }

    #[test]
    fn test_startgame_opens_character_intro_once() {
        let mut engine = engine(NarrativeProgress::default());
        let clock = fixed_clock();
        let square = at(61.4978, 23.7610);

        let triggers = engine.evaluate(&square, &clock);

        assert_eq!(triggers[0].kind, LocationKind::Startgame);
        assert_eq!(*engine.screen(), ScreenMode::CharacterIntro);
        assert!(engine.finish_intro());
        assert!(engine.evaluate(&square, &clock).is_empty());
        assert_eq!(*engine.screen(), ScreenMode::Map);
    }

    #[test]
    fn test_nearest_hint_uses_hint_compass_order() {
        // Arrange: the map is due north of the player.
        let engine = engine(NarrativeProgress {
            visited_locations: ["awakening".to_owned()].into_iter().collect(),
            ..NarrativeProgress::default()
        });
        let player = at(MAP_LAT - 0.001, MAP_LNG);

        // Act
        let hint = engine.nearest_hint(&player, &WeatherModifiers::neutral()).unwrap();

        // Assert
        assert_eq!(hint.location_id, "ancient_map");
        assert_eq!(hint.direction, CompassDirection::North);
        assert!((hint.distance_meters - 111.2).abs() < 1.0);
    }

    #[test]
    fn test_nearest_hint_reveals_secrets_only_up_close() {
        let engine = engine(NarrativeProgress::default());
        let compass = at(61.4752, 23.7309);
        let near = destination_point(&compass, 100.0, 90.0);
        let far = destination_point(&compass, 400.0, 45.0);
        let neutral = WeatherModifiers::neutral();

        let close_hint = engine.nearest_hint(&near, &neutral).unwrap();
        let far_hint = engine.nearest_hint(&far, &neutral).unwrap();

        assert_eq!(close_hint.location_id, "hidden_compass");
        assert_ne!(far_hint.location_id, "hidden_compass");
    }

    #[test]
    fn test_restoring_depleted_vitals_is_game_over_without_event() {
        let engine = engine(NarrativeProgress {
            sanity: 0,
            ..NarrativeProgress::default()
        });

        assert_eq!(*engine.screen(), ScreenMode::GameOver(GameOverCause::SanityDepleted));
        assert!(engine.uncommitted_events().is_empty());
    }
}
