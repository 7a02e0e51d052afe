//! Domain event abstractions and the typed event bus.

use serde::{Deserialize, Serialize};

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for logging and serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E) + Send>;

/// Synchronous, single-threaded observer over one typed event enum.
///
/// Handlers run in subscription order on the publishing thread.
pub struct EventBus<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> EventBus<E> {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    /// Registers a handler and returns its subscription handle.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        self.handlers.len() != before
    }

    /// Delivers `event` to every subscriber.
    pub fn publish(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Drops every subscription.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
