//! # Journal: in-memory event recorder.
//!
//! Keeps every delivered [`Event`] in arrival order so a finished run can be
//! inspected: how many restocks happened, which wake-ups were edge-triggered,
//! whether every worker reported termination.
//!
//! The coordinator drains subscriber queues before `run` returns, so a journal
//! read after `run` sees everything it was delivered.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that records events in memory.
pub struct Journal {
    events: Mutex<Vec<Event>>,
    capacity: usize,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal {
    /// Creates a journal with a generous queue (65 536 events).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1 << 16)
    }

    /// Creates a journal with the given queue capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Copy of every recorded event, in arrival order.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Recorded events of one kind.
    pub fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .map(|e| e.iter().filter(|ev| ev.kind == kind).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of recorded events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .map(|e| e.iter().filter(|ev| ev.kind == kind).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Subscribe for Journal {
    async fn on_event(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &'static str {
        "journal"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_arrival_order() {
        let j = Journal::new();
        j.on_event(&Event::new(EventKind::RecipeRequested)).await;
        j.on_event(&Event::new(EventKind::Replenished)).await;
        j.on_event(&Event::new(EventKind::Replenished)).await;

        assert_eq!(j.count(EventKind::Replenished), 2);
        let kinds: Vec<_> = j.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::RecipeRequested, EventKind::Replenished, EventKind::Replenished]
        );
        assert_eq!(j.of_kind(EventKind::RecipeRequested).len(), 1);
    }
}
