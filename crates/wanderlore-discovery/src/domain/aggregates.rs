//! Aggregate roots for the Procedural Discovery context.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;
use wanderlore_core::aggregate::AggregateRoot;
use wanderlore_core::clock::{Clock, elapsed_millis};
use wanderlore_core::error::DomainError;
use wanderlore_core::rng::{DeterministicRng, next_uuid};
use wanderlore_core::schedule::Scheduler;
use wanderlore_geo::{GeoPosition, Located, nearest, within};

use super::catalog::{DiscoveryCatalog, Rarity};
use super::config::DiscoveryConfig;
use super::events::{DiscoveryEvent, DiscoveryEventKind};
use super::spawn::spawn_point;

/// How many of the closest discoveries are exposed for display.
pub const NEARBY_LIMIT: usize = 3;

/// A procedurally spawned collectible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// RNG-derived identifier.
    pub id: Uuid,
    /// Catalog entry name, e.g. `Echo Fragment`.
    pub type_name: String,
    /// Rarity tier drawn from the catalog.
    pub rarity: Rarity,
    /// XP granted on collection.
    pub xp_value: f64,
    /// Where the discovery sits on the map.
    pub position: GeoPosition,
    /// Whether the player has picked it up.
    pub collected: bool,
    /// When it spawned; drives expiry.
    pub spawn_timestamp: DateTime<Utc>,
}

impl Located for Discovery {
    fn location(&self) -> GeoPosition {
        self.position
    }
}

/// Color band for a nearby discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProximityTier {
    /// More than 50 m away.
    Far,
    /// 20 to 50 m away.
    Near,
    /// Under 20 m away.
    Close,
}

impl ProximityTier {
    /// Classifies a distance in meters.
    #[must_use]
    pub fn from_distance(distance_meters: f64) -> Self {
        if distance_meters > 50.0 {
            Self::Far
        } else if distance_meters >= 20.0 {
            Self::Near
        } else {
            Self::Close
        }
    }
}

/// One of the closest live discoveries, as shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDiscovery {
    /// The live discovery's identifier.
    pub id: Uuid,
    /// Catalog entry name.
    pub type_name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Distance from the player at the last tick.
    pub distance_meters: f64,
    /// Display band for `distance_meters`.
    pub tier: ProximityTier,
}

/// Why a replacement spawn was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnCause {
    /// The player collected a discovery.
    Collected,
    /// A discovery outlived the respawn time.
    Expired,
}

/// The procedural discovery engine.
#[derive(Debug)]
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
    catalog: DiscoveryCatalog,
    live: Vec<Discovery>,
    respawns: Scheduler<RespawnCause>,
    last_position: Option<GeoPosition>,
    nearby: Vec<NearbyDiscovery>,
    collected_total: u32,
    uncommitted_events: Vec<DiscoveryEvent>,
}

impl DiscoveryEngine {
    /// Creates an engine with no live discoveries. Nothing spawns until the
    /// first position reaches [`DiscoveryEngine::tick`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the config is invalid.
    pub fn new(config: DiscoveryConfig, catalog: DiscoveryCatalog) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            live: Vec::new(),
            respawns: Scheduler::new(),
            last_position: None,
            nearby: Vec::new(),
            collected_total: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// Live, uncollected discoveries in spawn order.
    #[must_use]
    pub fn live(&self) -> &[Discovery] {
        &self.live
    }

    /// The closest discoveries as of the last tick, nearest first.
    #[must_use]
    pub fn nearby(&self) -> &[NearbyDiscovery] {
        &self.nearby
    }

    /// Replacement spawns waiting for their delay.
    #[must_use]
    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    /// Discoveries collected since the engine was created.
    #[must_use]
    pub fn collected_total(&self) -> u32 {
        self.collected_total
    }

    /// Whether a position has been observed yet.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.last_position.is_some()
    }

    /// Spawns up to `count` discoveries around `center`, bounded by the
    /// live cap. Returns how many were spawned.
    pub fn spawn_discoveries(
        &mut self,
        center: &GeoPosition,
        count: usize,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> usize {
        let room = self.config.max_discoveries.saturating_sub(self.live.len());
        let count = count.min(room);
        let now = clock.now();
        for _ in 0..count {
            let discovery_type = self.catalog.draw(rng).clone();
            let position = spawn_point(
                center,
                self.config.spawn_radius_meters,
                self.config.min_spawn_distance_meters,
                rng,
            );
            let discovery = Discovery {
                id: next_uuid(rng),
                type_name: discovery_type.name,
                rarity: discovery_type.rarity,
                xp_value: discovery_type.xp_value,
                position,
                collected: false,
                spawn_timestamp: now,
            };
            debug!(discovery_id = %discovery.id, rarity = ?discovery.rarity, "discovery spawned");
            self.record(
                now,
                DiscoveryEventKind::DiscoverySpawned {
                    discovery_id: discovery.id,
                    type_name: discovery.type_name.clone(),
                    rarity: discovery.rarity,
                    position,
                },
            );
            self.live.push(discovery);
        }
        count
    }

    /// Runs one update cycle at `position`: the deferred first spawn, due
    /// replacements, auto-collection, expiry and the nearby ranking.
    ///
    /// Returns the discoveries collected by this tick.
    pub fn tick(
        &mut self,
        position: &GeoPosition,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Vec<Discovery> {
        let now = clock.now();
        if self.last_position.is_none() {
            info!(lat = position.lat, lng = position.lng, "first position, spawning discoveries");
            self.spawn_discoveries(position, self.config.initial_batch, clock, rng);
        }
        self.last_position = Some(*position);

        for cause in self.respawns.drain_due(now) {
            debug!(?cause, "replacement spawn due");
            self.spawn_discoveries(position, 1, clock, rng);
        }

        let collected = self.collect_within_reach(position, now);
        self.expire_stale(now);

        self.nearby = nearest(position, &self.live, NEARBY_LIMIT)
            .into_iter()
            .map(|p| NearbyDiscovery {
                id: p.item.id,
                type_name: p.item.type_name.clone(),
                rarity: p.item.rarity,
                distance_meters: p.distance_meters,
                tier: ProximityTier::from_distance(p.distance_meters),
            })
            .collect();
        collected
    }

    fn collect_within_reach(&mut self, position: &GeoPosition, now: DateTime<Utc>) -> Vec<Discovery> {
        let radius = self.config.collection_radius_meters;
        let reached: Vec<Uuid> = within(position, self.live.iter().filter(|d| !d.collected), |_| radius)
            .iter()
            .map(|p| p.item.id)
            .collect();

        let mut collected = Vec::with_capacity(reached.len());
        for id in reached {
            let Some(index) = self.live.iter().position(|d| d.id == id) else {
                continue;
            };
            let mut discovery = self.live.remove(index);
            discovery.collected = true;
            self.collected_total += 1;
            info!(
                discovery_id = %discovery.id,
                rarity = ?discovery.rarity,
                xp = discovery.xp_value,
                "discovery collected"
            );
            self.record(
                now,
                DiscoveryEventKind::DiscoveryCollected {
                    discovery_id: discovery.id,
                    type_name: discovery.type_name.clone(),
                    rarity: discovery.rarity,
                    xp_value: discovery.xp_value,
                },
            );
            self.schedule_respawn(now, RespawnCause::Collected);
            collected.push(discovery);
        }
        collected
    }

    fn expire_stale(&mut self, now: DateTime<Utc>) {
        let max_age = self.config.respawn_time_ms;
        let (expired, kept): (Vec<Discovery>, Vec<Discovery>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|d| elapsed_millis(d.spawn_timestamp, now) > max_age);
        self.live = kept;
        for discovery in expired {
            debug!(discovery_id = %discovery.id, "discovery expired");
            self.record(
                now,
                DiscoveryEventKind::DiscoveryExpired {
                    discovery_id: discovery.id,
                },
            );
            self.schedule_respawn(now, RespawnCause::Expired);
        }
    }

    fn schedule_respawn(&mut self, now: DateTime<Utc>, cause: RespawnCause) {
        let due = now + Duration::milliseconds(self.config.respawn_delay_ms);
        self.respawns.schedule_at(due, cause);
    }

    /// Discards every live discovery and pending replacement, then spawns a
    /// fresh initial batch around the last known position. Returns the
    /// number spawned; zero before the first position.
    pub fn reshuffle(&mut self, clock: &dyn Clock, rng: &mut dyn DeterministicRng) -> usize {
        let Some(center) = self.last_position else {
            debug!("no position yet, ignoring reshuffle");
            return 0;
        };
        let discarded = self.live.len();
        self.live.clear();
        self.nearby.clear();
        self.respawns.clear();

        let spawned = self.spawn_discoveries(&center, self.config.initial_batch, clock, rng);
        info!(discarded, spawned, "discoveries reshuffled");
        self.record(
            clock.now(),
            DiscoveryEventKind::DiscoveriesReshuffled { discarded, spawned },
        );
        spawned
    }

    /// Drops every pending replacement spawn.
    pub fn cancel_respawns(&mut self) {
        self.respawns.clear();
    }

    fn record(&mut self, occurred_at: DateTime<Utc>, kind: DiscoveryEventKind) {
        self.uncommitted_events.push(DiscoveryEvent { occurred_at, kind });
    }
}

impl AggregateRoot for DiscoveryEngine {
    type Event = DiscoveryEvent;

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
    use wanderlore_core::event::DomainEvent;
    use wanderlore_geo::{destination_point, haversine_distance_meters};
    use wanderlore_test_support::{ManualClock, SeededRng};

    fn player() -> GeoPosition {
        GeoPosition::new(61.4978, 23.7610)
    }

    fn manual_clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn engine(config: DiscoveryConfig) -> DiscoveryEngine {
        DiscoveryEngine::new(config, DiscoveryCatalog::default()).unwrap()
    }

    fn count_of(engine: &DiscoveryEngine, event_type: &str) -> usize {
        engine
            .uncommitted_events()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    #[test]
    fn test_nothing_spawns_before_first_position() {
        let engine = engine(DiscoveryConfig::default());

        assert!(engine.live().is_empty());
        assert!(!engine.has_position());
        assert!(engine.uncommitted_events().is_empty());
    }

    #[test]
    fn test_first_tick_spawns_initial_batch_inside_ring() {
        // Arrange
        let mut engine = engine(DiscoveryConfig::default());
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(1);

        // Act
        let collected = engine.tick(&player(), &clock, &mut rng);

        // Assert
        assert!(collected.is_empty());
        assert_eq!(engine.live().len(), 6);
        for discovery in engine.live() {
            let distance = haversine_distance_meters(&player(), &discovery.position);
            assert!((19.5..=200.5).contains(&distance), "spawned at {distance} m");
            assert!(!discovery.collected);
        }
        assert_eq!(engine.nearby().len(), NEARBY_LIMIT);
        assert!(
            engine
                .nearby()
                .windows(2)
                .all(|w| w[0].distance_meters <= w[1].distance_meters)
        );
        assert_eq!(count_of(&engine, "discovery.spawned"), 6);
    }

    #[test]
    fn test_walking_onto_discovery_collects_and_respawns_after_delay() {
        // Arrange
        let config = DiscoveryConfig {
            initial_batch: 1,
            ..DiscoveryConfig::default()
        };
        let mut engine = engine(config);
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(2);
        engine.tick(&player(), &clock, &mut rng);
        let target = engine.live()[0].clone();
        let standing = destination_point(&target.position, 3.0, 90.0);

        // Act
        let collected = engine.tick(&standing, &clock, &mut rng);

        // Assert
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].id, target.id);
        assert!(collected[0].collected);
        assert!(engine.live().is_empty());
        assert_eq!(engine.collected_total(), 1);
        assert_eq!(engine.pending_respawns(), 1);
        let awarded: Vec<f64> = engine
            .uncommitted_events()
            .iter()
            .filter_map(|e| match &e.kind {
                DiscoveryEventKind::DiscoveryCollected { xp_value, .. } => Some(*xp_value),
                _ => None,
            })
            .collect();
        assert_eq!(awarded, vec![target.xp_value]);

        clock.advance_millis(1_999);
        engine.tick(&standing, &clock, &mut rng);
        assert!(engine.live().is_empty());

        clock.advance_millis(1);
        engine.tick(&standing, &clock, &mut rng);
        assert_eq!(engine.live().len(), 1);
        assert_eq!(engine.pending_respawns(), 0);
    }

    #[test]
    fn test_repeated_tick_does_not_recollect() {
        let config = DiscoveryConfig {
            initial_batch: 1,
            ..DiscoveryConfig::default()
        };
        let mut engine = engine(config);
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(3);
        engine.tick(&player(), &clock, &mut rng);
        let standing = engine.live()[0].position;

        let first = engine.tick(&standing, &clock, &mut rng);
        let second = engine.tick(&standing, &clock, &mut rng);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(engine.collected_total(), 1);
    }

    #[test]
    fn test_discoveries_expire_after_respawn_time_and_are_replaced() {
        // Arrange
        let mut engine = engine(DiscoveryConfig::default());
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(4);
        engine.tick(&player(), &clock, &mut rng);

        // Act / Assert: exactly at the limit nothing expires.
        clock.advance_millis(300_000);
        engine.tick(&player(), &clock, &mut rng);
        assert_eq!(engine.live().len(), 6);

        clock.advance_millis(1);
        engine.tick(&player(), &clock, &mut rng);
        assert!(engine.live().is_empty());
        assert_eq!(engine.pending_respawns(), 6);
        assert_eq!(count_of(&engine, "discovery.expired"), 6);
        assert_eq!(engine.collected_total(), 0);

        clock.advance_millis(2_000);
        engine.tick(&player(), &clock, &mut rng);
        assert_eq!(engine.live().len(), 6);
    }

    #[test]
    fn test_spawning_is_bounded_by_max_discoveries() {
        let mut engine = engine(DiscoveryConfig::default());
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(5);
        engine.tick(&player(), &clock, &mut rng);

        let spawned = engine.spawn_discoveries(&player(), 10, &clock, &mut rng);

        assert_eq!(spawned, 4);
        assert_eq!(engine.live().len(), 10);
    }

    #[test]
    fn test_reshuffle_replaces_batch_and_cancels_respawns() {
        // Arrange
        let mut engine = engine(DiscoveryConfig::default());
        let clock = manual_clock();
        let mut rng = SeededRng::from_seed(6);
        assert_eq!(engine.reshuffle(&clock, &mut rng), 0);
        engine.tick(&player(), &clock, &mut rng);
        let before: Vec<Uuid> = engine.live().iter().map(|d| d.id).collect();
        clock.advance_millis(300_001);
        engine.tick(&player(), &clock, &mut rng);
        assert_eq!(engine.pending_respawns(), 6);

        // Act
        let spawned = engine.reshuffle(&clock, &mut rng);

        // Assert
        assert_eq!(spawned, 6);
        assert_eq!(engine.pending_respawns(), 0);
        assert!(engine.live().iter().all(|d| !before.contains(&d.id)));
        assert_eq!(count_of(&engine, "discovery.reshuffled"), 1);
    }

    #[test]
    fn test_same_seed_replays_same_discoveries() {
        let clock = manual_clock();
        let mut a = engine(DiscoveryConfig::default());
        let mut b = engine(DiscoveryConfig::default());

        a.tick(&player(), &clock, &mut SeededRng::from_seed(9));
        b.tick(&player(), &clock, &mut SeededRng::from_seed(9));

        assert_eq!(a.live(), b.live());
    }

    #[test]
    fn test_proximity_tier_boundaries() {
        assert_eq!(ProximityTier::from_distance(50.1), ProximityTier::Far);
        assert_eq!(ProximityTier::from_distance(50.0), ProximityTier::Near);
        assert_eq!(ProximityTier::from_distance(20.0), ProximityTier::Near);
        assert_eq!(ProximityTier::from_distance(19.9), ProximityTier::Close);
    }
}
