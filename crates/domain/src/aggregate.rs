//! Core aggregate and domain event traits.

use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Clone {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;
}

/// Trait for aggregates whose state changes only by applying events.
///
/// Command methods validate against the current state and produce events;
/// `apply` folds an event into the state and never fails.
pub trait Aggregate: Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Given the same state and event this must always produce the same new
    /// state, and it must not fail: events represent facts that already
    /// happened.
    fn apply(&mut self, event: Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}
