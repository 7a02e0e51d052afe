//! Aggregate roots for the World State context.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use wanderlore_core::aggregate::AggregateRoot;
use wanderlore_core::clock::Clock;

use super::events::{WorldStateEvent, WorldStateEventKind};
use super::weather::WeatherModifiers;

/// Default interval between weather refreshes, in milliseconds.
pub const DEFAULT_WEATHER_REFRESH_MS: i64 = 300_000;

/// Cached weather modifiers with their refresh schedule.
#[derive(Debug)]
pub struct WeatherState {
    refresh_interval: Duration,
    modifiers: WeatherModifiers,
    fetched_at: Option<DateTime<Utc>>,
    next_refresh: Option<DateTime<Utc>>,
    uncommitted_events: Vec<WorldStateEvent>,
}

impl WeatherState {
    /// Creates a state with neutral modifiers that is due for refresh.
    #[must_use]
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            modifiers: WeatherModifiers::neutral(),
            fetched_at: None,
            next_refresh: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// The modifiers currently in effect.
    #[must_use]
    pub fn modifiers(&self) -> &WeatherModifiers {
        &self.modifiers
    }

    /// When the current modifiers were received, if ever.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Whether a refresh should run at `now`.
    #[must_use]
    pub fn is_refresh_due(&self, now: DateTime<Utc>) -> bool {
        self.next_refresh.is_none_or(|due| now >= due)
    }

    /// Records a successful fetch, producing a `WeatherUpdated` event when
    /// the modifiers changed.
    pub fn record_report(&mut self, modifiers: WeatherModifiers, clock: &dyn Clock) {
        let now = clock.now();
        let modifiers = modifiers.sanitized();
        self.fetched_at = Some(now);
        self.next_refresh = Some(now + self.refresh_interval);
        if modifiers == self.modifiers {
            return;
        }
        info!(
            difficulty = modifiers.difficulty_modifier,
            sanity = modifiers.sanity_modifier,
            "weather modifiers updated"
        );
        self.modifiers = modifiers.clone();
        self.uncommitted_events.push(WorldStateEvent {
            occurred_at: now,
            kind: WorldStateEventKind::WeatherUpdated { modifiers },
        });
    }

    /// Records a failed fetch: modifiers revert to neutral until the next
    /// scheduled refresh.
    pub fn record_failure(&mut self, reason: &str, clock: &dyn Clock) {
        let now = clock.now();
        warn!(reason, "weather fetch failed, using neutral modifiers");
        self.next_refresh = Some(now + self.refresh_interval);
        if self.modifiers == WeatherModifiers::neutral() {
            return;
        }
        self.modifiers = WeatherModifiers::neutral();
        self.uncommitted_events.push(WorldStateEvent {
            occurred_at: now,
            kind: WorldStateEventKind::WeatherDegraded {
                reason: reason.to_owned(),
            },
        });
    }
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_WEATHER_REFRESH_MS))
    }
}

impl AggregateRoot for WeatherState {
    type Event = WorldStateEvent;

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
