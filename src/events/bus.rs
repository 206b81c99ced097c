//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`] so any worker can publish without
//! blocking, including from inside a stockpile critical section.
//!
//! ```text
//! Publishers (many):                   Listener (one):
//!   Supplier ──┐
//!   Consumer ──┼──────► Bus ───────► coordinator listener ────► SubscriberSet
//!   Pantry   ──┤  (broadcast chan)
//!   Coord.   ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks; with no receivers the event is dropped.
//! - One bounded ring buffer is shared by all receivers; a receiver that falls
//!   behind observes `RecvError::Lagged(n)` and skips `n` events.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given ring-buffer capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver for events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receiver_sees_events_published_after_subscribe() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::RecipeRequested));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::Replenished));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::Replenished);
    }
}
