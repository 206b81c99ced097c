//! # Runtime events emitted by suppliers, consumers and the coordinator.
//!
//! [`EventKind`] classifies events in four groups:
//! - **Consumer events**: recipe requested, ingredient taken, retry, recipe completed, done
//! - **Supplier events**: resupply requested, replenished, done
//! - **Shutdown events**: shutdown requested, all stopped
//! - **Subscriber events**: overflow, panic
//!
//! [`Event`] carries the metadata: timestamp, worker, ingredient, amounts, etc.
//!
//! ## Ordering guarantees
//! Each event has a globally unique, monotonically increasing `seq`. Use it to
//! restore order when events from different subscribers' queues are merged.
//!
//! ## Example
//! ```rust
//! use pantry::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Replenished)
//!     .with_worker("supplier:Spice")
//!     .with_ingredient("Spice")
//!     .with_amount(5)
//!     .with_remaining(5);
//!
//! assert_eq!(ev.kind, EventKind::Replenished);
//! assert_eq!(ev.ingredient.as_deref(), Some("Spice"));
//! assert_eq!(ev.amount, Some(5));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::recipes::Recipe;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Consumer events ===
    /// A consumer generated the recipe for its next work unit.
    ///
    /// Sets: `worker`, `attempt` (1-based work unit), `recipe`.
    RecipeRequested,

    /// A consumer debited one ingredient (or, all-or-nothing, each ingredient of the recipe).
    ///
    /// Sets: `worker`, `ingredient`, `amount`, `remaining`.
    IngredientTaken,

    /// A consumer found too little stock and scheduled another look.
    ///
    /// Sets: `worker`, `ingredient` (first short one), `remaining` (available),
    /// `attempt` (retry number, 1-based), `delay_ms`.
    AcquireRetry,

    /// A consumer finished a work unit.
    ///
    /// Sets: `worker`, `attempt` (1-based work unit).
    RecipeCompleted,

    /// A consumer terminated.
    ///
    /// Sets: `worker`, `units` (work units completed), `reason` (`"exhausted"` or `"cancelled"`).
    ConsumerDone,

    // === Supplier events ===
    /// A supplier's replenishment signal was posted.
    ///
    /// Sets: `worker` (the poster), `ingredient`, `cause`.
    ResupplyRequested,

    /// A supplier credited its batch.
    ///
    /// Sets: `worker`, `ingredient`, `amount` (batch), `remaining` (new quantity).
    Replenished,

    /// A supplier terminated.
    ///
    /// Sets: `worker`, `ingredient`, `units` (replenishments performed).
    SupplierDone,

    // === Shutdown events ===
    /// Every consumer finished; the running token is being cancelled.
    ShutdownRequested,

    /// Every supplier has terminated.
    AllStopped,

    // === Subscriber events ===
    /// A subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `worker` (subscriber name), `reason`.
    SubscriberOverflow,

    /// A subscriber panicked while handling an event.
    ///
    /// Sets: `worker` (subscriber name), `reason` (panic message).
    SubscriberPanicked,
}

/// Why a replenishment signal was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResupplyCause {
    /// A debit moved the quantity from positive to zero.
    Depleted,
    /// A consumer could not be served from the current stock.
    Starved,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields depend on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker (or subscriber) name.
    pub worker: Option<Arc<str>>,
    /// Ingredient name.
    pub ingredient: Option<Arc<str>>,
    /// Quantity moved by this event.
    pub amount: Option<u32>,
    /// Quantity on hand after (or observed by) this event.
    pub remaining: Option<u32>,
    /// Work unit or retry number (1-based).
    pub attempt: Option<u32>,
    /// Retry delay in milliseconds.
    pub delay_ms: Option<u32>,
    /// Completed units for terminal worker events.
    pub units: Option<u32>,
    /// Requested recipe.
    pub recipe: Option<Arc<Recipe>>,
    /// Resupply trigger.
    pub cause: Option<ResupplyCause>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of `kind` with the current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            ingredient: None,
            amount: None,
            remaining: None,
            attempt: None,
            delay_ms: None,
            units: None,
            recipe: None,
            cause: None,
            reason: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches an ingredient name.
    #[inline]
    pub fn with_ingredient(mut self, ingredient: impl Into<Arc<str>>) -> Self {
        self.ingredient = Some(ingredient.into());
        self
    }

    /// Attaches the quantity moved.
    #[inline]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Attaches the quantity on hand.
    #[inline]
    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining = Some(remaining);
        self
    }

    /// Attaches a work unit / retry number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a completed-units count.
    #[inline]
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = Some(units);
        self
    }

    /// Attaches the requested recipe.
    #[inline]
    pub fn with_recipe(mut self, recipe: Arc<Recipe>) -> Self {
        self.recipe = Some(recipe);
        self
    }

    /// Attaches a resupply cause.
    #[inline]
    pub fn with_cause(mut self, cause: ResupplyCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }

    /// True for the coordinator's final event.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::AllStopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::RecipeRequested);
        let b = Event::new(EventKind::RecipeCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_is_stored_in_millis() {
        let ev = Event::new(EventKind::AcquireRetry).with_delay(Duration::from_micros(2_500));
        assert_eq!(ev.delay_ms, Some(2));
    }

    #[test]
    fn overflow_event_names_subscriber() {
        let ev = Event::subscriber_overflow("journal", "full");
        assert_eq!(ev.worker.as_deref(), Some("journal"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=journal reason=full"));
        assert!(!ev.is_terminal());
    }
}
