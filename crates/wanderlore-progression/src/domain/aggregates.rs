//! Aggregate roots for the Progression context.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wanderlore_core::aggregate::AggregateRoot;
use wanderlore_core::clock::Clock;
use wanderlore_core::error::DomainError;

use super::curve::{ConsciousnessTier, LevelCurve};
use super::events::{ProgressionEvent, ProgressionEventKind};

/// Persisted slice of the player state owned by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsciousnessState {
    /// Current level, starting at 1.
    pub consciousness_level: u32,
    /// XP accumulated towards the next level.
    pub current_xp: f64,
    /// Lifetime XP.
    pub total_xp: f64,
    /// Unlocked achievement ids.
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    /// Unlocked lore ids.
    #[serde(default)]
    pub lore_unlocked: BTreeSet<String>,
}

impl Default for ConsciousnessState {
    fn default() -> Self {
        Self {
            consciousness_level: 1,
            current_xp: 0.0,
            total_xp: 0.0,
            achievements: BTreeSet::new(),
            lore_unlocked: BTreeSet::new(),
        }
    }
}

/// The XP/level ledger.
#[derive(Debug)]
pub struct ConsciousnessLedger {
    curve: LevelCurve,
    state: ConsciousnessState,
    uncommitted_events: Vec<ProgressionEvent>,
}

impl ConsciousnessLedger {
    /// Creates a ledger over restored state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the curve is invalid.
    pub fn new(curve: LevelCurve, mut state: ConsciousnessState) -> Result<Self, DomainError> {
        curve.validate()?;
        state.consciousness_level = state.consciousness_level.max(1);
        if !state.current_xp.is_finite() || state.current_xp < 0.0 {
            state.current_xp = 0.0;
        }
        if !state.total_xp.is_finite() || state.total_xp < state.current_xp {
            state.total_xp = state.current_xp;
        }
        Ok(Self {
            curve,
            state,
            uncommitted_events: Vec::new(),
        })
    }

    /// The persisted state.
    #[must_use]
    pub fn state(&self) -> &ConsciousnessState {
        &self.state
    }

    /// The current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.state.consciousness_level
    }

    /// The named stage for the current level.
    #[must_use]
    pub fn tier(&self) -> &ConsciousnessTier {
        self.curve.tier_for(self.state.consciousness_level)
    }

    /// XP required to leave the current level.
    #[must_use]
    pub fn xp_for_next_level(&self) -> f64 {
        self.curve.threshold(self.state.consciousness_level)
    }

    /// Adds XP and resolves every level-up it pays for. Returns the number
    /// of levels gained.
    pub fn award_xp(&mut self, amount: f64, source: &str, clock: &dyn Clock) -> u32 {
        if !amount.is_finite() || amount <= 0.0 {
            debug!(amount, source, "ignoring non-positive XP award");
            return 0;
        }
        let now = clock.now();
        self.state.current_xp += amount;
        self.state.total_xp += amount;
        self.uncommitted_events.push(ProgressionEvent {
            occurred_at: now,
            kind: ProgressionEventKind::XpAwarded {
                amount,
                source: source.to_owned(),
                total_xp: self.state.total_xp,
            },
        });

        let mut gained = 0;
        while self.state.current_xp >= self.xp_for_next_level() {
            self.level_up(clock);
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self, clock: &dyn Clock) {
        let now = clock.now();
        let previous = self.tier().clone();
        self.state.current_xp -= self.xp_for_next_level();
        self.state.consciousness_level += 1;
        let level = self.state.consciousness_level;
        info!(level, "consciousness level up");
        self.uncommitted_events.push(ProgressionEvent {
            occurred_at: now,
            kind: ProgressionEventKind::LevelUp { level },
        });

        let current = self.tier().clone();
        if current.name != previous.name {
            info!(from = %previous.name, to = %current.name, "consciousness stage changed");
            self.uncommitted_events.push(ProgressionEvent {
                occurred_at: now,
                kind: ProgressionEventKind::StageChanged {
                    from: previous.name,
                    to: current.name,
                    color: current.color,
                },
            });
        }
    }

    /// Unlocks an achievement once, optionally paying XP. Returns `false`
    /// if it was already unlocked.
    pub fn unlock_achievement(
        &mut self,
        achievement_id: &str,
        xp_reward: Option<f64>,
        clock: &dyn Clock,
    ) -> bool {
        if !self.state.achievements.insert(achievement_id.to_owned()) {
            return false;
        }
        info!(achievement_id, "achievement unlocked");
        self.uncommitted_events.push(ProgressionEvent {
            occurred_at: clock.now(),
            kind: ProgressionEventKind::AchievementUnlocked {
                achievement_id: achievement_id.to_owned(),
            },
        });
        if let Some(xp) = xp_reward {
            self.award_xp(xp, &format!("achievement:{achievement_id}"), clock);
        }
        true
    }

    /// Unlocks a lore entry once. Returns `false` if it was already unlocked.
    pub fn unlock_lore(&mut self, lore_id: &str, clock: &dyn Clock) -> bool {
        if !self.state.lore_unlocked.insert(lore_id.to_owned()) {
            return false;
        }
        self.uncommitted_events.push(ProgressionEvent {
            occurred_at: clock.now(),
            kind: ProgressionEventKind::LoreUnlocked {
                lore_id: lore_id.to_owned(),
            },
        });
        true
    }
}

impl AggregateRoot for ConsciousnessLedger {
    type Event = ProgressionEvent;

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
    use chrono::{TimeZone, Utc};
    use wanderlore_core::event::DomainEvent;
    use wanderlore_test_support::FixedClock;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn ledger() -> ConsciousnessLedger {
        ConsciousnessLedger::new(LevelCurve::default(), ConsciousnessState::default()).unwrap()
    }

    fn event_types(ledger: &ConsciousnessLedger) -> Vec<&'static str> {
        ledger
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    #[test]
    fn test_award_below_threshold_only_accumulates() {
        let mut ledger = ledger();

        let gained = ledger.award_xp(40.0, "discovery", &fixed_clock());

        assert_eq!(gained, 0);
        assert_eq!(ledger.level(), 1);
        assert!((ledger.state().current_xp - 40.0).abs() < f64::EPSILON);
        assert!((ledger.state().total_xp - 40.0).abs() < f64::EPSILON);
        assert_eq!(event_types(&ledger), ["progression.xp_awarded"]);
    }

    #[test]
    fn test_award_of_two_and_a_half_thresholds_levels_twice() {
        // Arrange
        let mut ledger = ledger();
        let award = ledger.xp_for_next_level() * 2.5;

        // Act
        let gained = ledger.award_xp(award, "test", &fixed_clock());

        // Assert: 250 - 100 (level 1) - 141 (level 2) leaves 9 towards level 3.
        assert_eq!(gained, 2);
        assert_eq!(ledger.level(), 3);
        assert!((ledger.state().current_xp - 9.0).abs() < 1e-9);
        assert!((ledger.state().total_xp - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_award_resolves_by_recomputed_thresholds() {
        let curve = LevelCurve::default();
        let mut ledger = ledger();
        let award = 1_000.0;

        let gained = ledger.award_xp(award, "test", &fixed_clock());

        let mut level = 1;
        let mut remaining = award;
        while remaining >= curve.threshold(level) {
            remaining -= curve.threshold(level);
            level += 1;
        }
        assert_eq!(ledger.level(), level);
        assert_eq!(gained, level - 1);
        assert!((ledger.state().current_xp - remaining).abs() < 1e-9);
        assert!(ledger.state().current_xp < ledger.xp_for_next_level());
    }

    #[test]
    fn test_award_of_three_hundred_reaches_level_three() {
        let mut ledger = ledger();

        ledger.award_xp(300.0, "test", &fixed_clock());

        assert_eq!(ledger.level(), 3);
        assert!((ledger.state().current_xp - 59.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossing_a_breakpoint_emits_stage_changed() {
        let mut ledger = ledger();

        // 100 + 141 reaches level 3, the "Stirring" breakpoint.
        ledger.award_xp(241.0, "test", &fixed_clock());

        assert_eq!(ledger.tier().name, "Stirring");
        assert_eq!(
            event_types(&ledger),
            [
                "progression.xp_awarded",
                "progression.level_up",
                "progression.level_up",
                "progression.stage_changed"
            ]
        );
        match &ledger.uncommitted_events()[3].kind {
            ProgressionEventKind::StageChanged { from, to, .. } => {
                assert_eq!(from, "Dormant");
                assert_eq!(to, "Stirring");
            }
            other => panic!("expected StageChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_award_is_ignored() {
        let mut ledger = ledger();

        assert_eq!(ledger.award_xp(0.0, "test", &fixed_clock()), 0);
        assert_eq!(ledger.award_xp(-10.0, "test", &fixed_clock()), 0);
        assert_eq!(ledger.award_xp(f64::NAN, "test", &fixed_clock()), 0);
        assert!(ledger.uncommitted_events().is_empty());
    }

    #[test]
    fn test_unlock_achievement_is_idempotent() {
        let mut ledger = ledger();
        let clock = fixed_clock();

        assert!(ledger.unlock_achievement("first_discovery", Some(50.0), &clock));
        assert!(!ledger.unlock_achievement("first_discovery", Some(50.0), &clock));

        assert!((ledger.state().total_xp - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            event_types(&ledger),
            ["progression.achievement_unlocked", "progression.xp_awarded"]
        );
    }

    #[test]
    fn test_unlock_lore_is_idempotent() {
        let mut ledger = ledger();
        let clock = fixed_clock();

        assert!(ledger.unlock_lore("lore_ancient_map", &clock));
        assert!(!ledger.unlock_lore("lore_ancient_map", &clock));

        assert!(ledger.state().lore_unlocked.contains("lore_ancient_map"));
        assert_eq!(ledger.take_uncommitted_events().len(), 1);
        assert!(ledger.uncommitted_events().is_empty());
    }

    #[test]
    fn test_new_repairs_corrupt_restored_state() {
        let restored = ConsciousnessState {
            consciousness_level: 0,
            current_xp: f64::NAN,
            total_xp: -4.0,
            ..ConsciousnessState::default()
        };

        let ledger = ConsciousnessLedger::new(LevelCurve::default(), restored).unwrap();

        assert_eq!(ledger.level(), 1);
        assert!(ledger.state().current_xp.abs() < f64::EPSILON);
        assert!(ledger.state().total_xp.abs() < f64::EPSILON);
    }
}
