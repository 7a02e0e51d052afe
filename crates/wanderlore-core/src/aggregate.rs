//! Aggregate root abstraction.

use crate::event::DomainEvent;

/// Trait for aggregate roots that buffer the events produced by their
/// state transitions until the owner drains them.
pub trait AggregateRoot {
    /// The event type this aggregate produces.
    type Event: DomainEvent;

    /// Returns events produced since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Removes and returns the buffered events, oldest first.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
