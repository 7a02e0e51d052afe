//! Command handlers for the World State context.
//!
//! Weather fetch failures are absorbed here and never reach the engines.

use tracing::debug;
use wanderlore_core::clock::Clock;

use crate::domain::aggregates::WeatherState;
use crate::domain::weather::WeatherSource;

/// Refreshes the weather cache if a refresh is due.
///
/// Returns `true` when a fetch was attempted.
pub async fn handle_refresh_weather(
    state: &mut WeatherState,
    source: &dyn WeatherSource,
    clock: &dyn Clock,
) -> bool {
    if !state.is_refresh_due(clock.now()) {
        debug!("weather refresh not yet due");
        return false;
    }
    match source.fetch_modifiers().await {
        Ok(modifiers) => state.record_report(modifiers, clock),
        Err(e) => state.record_failure(&e.to_string(), clock),
    }
    true
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use wanderlore_core::error::DomainError;
    use wanderlore_test_support::{FixedClock, ManualClock};

    use super::*;
    use crate::domain::weather::{StaticWeatherSource, WeatherModifiers};

    struct FailingWeatherSource;

    #[async_trait]
    impl WeatherSource for FailingWeatherSource {
        async fn fetch_modifiers(&self) -> Result<WeatherModifiers, DomainError> {
            Err(DomainError::Infrastructure("weather api unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_refresh_applies_fetched_modifiers() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let foggy = WeatherModifiers {
            visibility_range: 0.4,
            sanity_modifier: 1.1,
            ..WeatherModifiers::neutral()
        };
        let source = StaticWeatherSource::new(foggy.clone());
        let mut state = WeatherState::default();

        let attempted = handle_refresh_weather(&mut state, &source, &clock).await;

        assert!(attempted);
        assert_eq!(*state.modifiers(), foggy);
    }

    #[tokio::test]
    async fn test_refresh_failure_yields_neutral_modifiers() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let mut state = WeatherState::default();

        let attempted = handle_refresh_weather(&mut state, &FailingWeatherSource, &clock).await;

        assert!(attempted);
        assert_eq!(*state.modifiers(), WeatherModifiers::neutral());
    }

    #[tokio::test]
    async fn test_refresh_skips_until_interval_elapses() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let source = StaticWeatherSource::default();
        let mut state = WeatherState::default();

        assert!(handle_refresh_weather(&mut state, &source, &clock).await);
        clock.advance(Duration::minutes(2));
        assert!(!handle_refresh_weather(&mut state, &source, &clock).await);
        clock.advance(Duration::minutes(3));
        assert!(handle_refresh_weather(&mut state, &source, &clock).await);
    }
}
