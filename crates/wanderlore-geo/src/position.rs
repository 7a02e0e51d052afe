//! Player position: samples, the fallback tracker and the source contract.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A position snapshot. Copied by value into every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Reported horizontal accuracy in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Sample time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl GeoPosition {
    /// Creates a position without accuracy or timestamp.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy: None,
            timestamp: None,
        }
    }

    /// Attaches an accuracy radius.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Attaches a sample timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }

    /// Whether the coordinate is finite and on the globe.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
            && self.accuracy.is_none_or(|a| a.is_finite() && a >= 0.0)
    }
}

/// Why the position source could not deliver a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum PositionError {
    /// The player refused location access.
    #[error("location permission denied")]
    PermissionDenied,
    /// No fix was obtained in time.
    #[error("location request timed out")]
    Timeout,
    /// Sensor or platform failure.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// One message from the position source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PositionUpdate {
    /// A fresh fix.
    Sample(GeoPosition),
    /// The source failed.
    Unavailable(PositionError),
}

/// One-time notice that the game is running on the fallback coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAdvisory {
    /// What went wrong.
    pub reason: PositionError,
    /// The position substituted for the player.
    pub fallback: GeoPosition,
}

/// Result of feeding one update into the tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionOutcome {
    /// The new current position, if it changed.
    pub position: Option<GeoPosition>,
    /// Advisory to surface, present at most once per tracker.
    pub advisory: Option<PositionAdvisory>,
}

/// Normalizes the raw update stream into a single current position.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    fallback: GeoPosition,
    current: Option<GeoPosition>,
    has_real_fix: bool,
    advisory_sent: bool,
}

impl PositionTracker {
    /// Creates a tracker that substitutes `fallback` when no fix is available.
    #[must_use]
    pub fn new(fallback: GeoPosition) -> Self {
        Self {
            fallback,
            current: None,
            has_real_fix: false,
            advisory_sent: false,
        }
    }

    /// The current position, once any update has arrived.
    #[must_use]
    pub fn current(&self) -> Option<GeoPosition> {
        self.current
    }

    /// Reported accuracy of the current fix.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        self.current.and_then(|p| p.accuracy)
    }

    /// Whether the current position is the fallback coordinate.
    #[must_use]
    pub fn is_using_fallback(&self) -> bool {
        self.current.is_some() && !self.has_real_fix
    }

    /// Applies one update.
    ///
    /// Invalid samples are ignored. A failure before the first real fix
    /// switches to the fallback coordinate; a failure afterwards keeps the
    /// last known fix.
    pub fn ingest(&mut self, update: PositionUpdate) -> PositionOutcome {
        match update {
            PositionUpdate::Sample(sample) => {
                if !sample.is_valid() {
                    warn!(lat = sample.lat, lng = sample.lng, "ignoring invalid position sample");
                    return PositionOutcome::default();
                }
                self.has_real_fix = true;
                self.current = Some(sample);
                PositionOutcome {
                    position: Some(sample),
                    advisory: None,
                }
            }
            PositionUpdate::Unavailable(reason) => {
                let advisory = if self.advisory_sent {
                    debug!(%reason, "position still unavailable");
                    None
                } else {
                    self.advisory_sent = true;
                    info!(%reason, "position unavailable, advising player");
                    Some(PositionAdvisory {
                        reason,
                        fallback: self.fallback,
                    })
                };
                if self.has_real_fix {
                    return PositionOutcome {
                        position: None,
                        advisory,
                    };
                }
                let changed = self.current != Some(self.fallback);
                self.current = Some(self.fallback);
                PositionOutcome {
                    position: changed.then_some(self.fallback),
                    advisory,
                }
            }
        }
    }
}

/// Permission state reported by a position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Location access allowed.
    Granted,
    /// Location access refused.
    Denied,
    /// The player has not answered yet.
    Prompt,
}

/// Contract of the external geolocation collaborator.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// The latest valid fix, if any.
    fn current_position(&self) -> Option<GeoPosition>;

    /// Accuracy of the latest fix.
    fn accuracy(&self) -> Option<f64>;

    /// Push subscription; the receiver yields every update after subscription.
    fn subscribe(&self) -> watch::Receiver<Option<PositionUpdate>>;

    /// Asks the platform for location access.
    async fn request_permission(&self) -> PermissionState;
}

/// Position source fed by an external pusher, e.g. an HTTP client.
#[derive(Debug)]
pub struct ChannelPositionSource {
    sender: watch::Sender<Option<PositionUpdate>>,
    permission: Mutex<PermissionState>,
}

impl ChannelPositionSource {
    /// Creates a source with the given initial permission state.
    #[must_use]
    pub fn new(permission: PermissionState) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            permission: Mutex::new(permission),
        }
    }

    /// Publishes an update to every subscriber.
    pub fn push(&self, update: PositionUpdate) {
        if let PositionUpdate::Unavailable(PositionError::PermissionDenied) = &update {
            self.set_permission(PermissionState::Denied);
        }
        self.sender.send_replace(Some(update));
    }

    /// Overrides the permission answer returned by `request_permission`.
    pub fn set_permission(&self, state: PermissionState) {
        if let Ok(mut guard) = self.permission.lock() {
            *guard = state;
        }
    }
}

#[async_trait]
impl PositionSource for ChannelPositionSource {
    fn current_position(&self) -> Option<GeoPosition> {
        match &*self.sender.borrow() {
            Some(PositionUpdate::Sample(p)) => Some(*p),
            _ => None,
        }
    }

    fn accuracy(&self) -> Option<f64> {
        self.current_position().and_then(|p| p.accuracy)
    }

    fn subscribe(&self) -> watch::Receiver<Option<PositionUpdate>> {
        self.sender.subscribe()
    }

    async fn request_permission(&self) -> PermissionState {
        let state = self
            .permission
            .lock()
            .map_or(PermissionState::Denied, |guard| *guard);
        if state == PermissionState::Prompt {
            // Headless sources cannot prompt; pushing samples implies consent.
            return PermissionState::Granted;
        }
        state
    }
}
