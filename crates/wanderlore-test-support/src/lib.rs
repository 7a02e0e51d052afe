//! Shared test mocks and utilities for the Wanderlore engine.

mod clock;
mod position;
mod rng;
mod store;

pub use clock::{FixedClock, ManualClock};
pub use position::{moved, sample};
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingHighscoreSink, FailingStore, RecordingHighscoreSink};
pub use wanderlore_core::rng::SeededRng;
