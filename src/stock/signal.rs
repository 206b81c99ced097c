//! # Replenishment signals: one counting wake-up per ingredient.
//!
//! A [`ReplenishmentSignal`] is a semaphore with zero initial permits. Posting
//! adds a permit; a supplier waiting on the signal consumes one. Because the
//! count accumulates, a redundant post is harmless: the supplier wakes, re-checks
//! the stock under the lock and goes back to waiting.
//!
//! ## Rules
//! - [`ReplenishmentSignal::notify`] never blocks and never fails.
//! - [`ReplenishmentSignal::wait`] races the permit against the running token,
//!   so a cancelled pantry always unblocks its suppliers.
//! - [`SignalSet::notify_all`] posts once to every signal (shutdown broadcast).

use tokio::select;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::stock::ingredient::IngredientId;

/// Why a [`ReplenishmentSignal::wait`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wakeup {
    /// A pending wake-up was consumed.
    Signaled,
    /// The running token was cancelled.
    Cancelled,
}

/// Counting wake-up primitive for one supplier.
#[derive(Debug)]
pub struct ReplenishmentSignal {
    permits: Semaphore,
}

impl Default for ReplenishmentSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplenishmentSignal {
    /// Creates an unsignaled wake-up.
    pub fn new() -> Self {
        Self {
            permits: Semaphore::new(0),
        }
    }

    /// Records one pending wake-up.
    #[inline]
    pub fn notify(&self) {
        self.permits.add_permits(1);
    }

    /// Number of wake-ups not yet consumed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.permits.available_permits()
    }

    /// Blocks until a wake-up is pending (and consumes it) or `token` is cancelled.
    ///
    /// A cancelled token wins over an already-pending wake-up: once the pantry
    /// stops, suppliers must observe it rather than replenish again.
    pub async fn wait(&self, token: &CancellationToken) -> Wakeup {
        if token.is_cancelled() {
            return Wakeup::Cancelled;
        }
        select! {
            biased;
            _ = token.cancelled() => Wakeup::Cancelled,
            permit = self.permits.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    Wakeup::Signaled
                }
                // The semaphore is never closed while the pantry lives.
                Err(_closed) => Wakeup::Cancelled,
            },
        }
    }
}

/// One [`ReplenishmentSignal`] per ingredient, indexed by [`IngredientId`].
#[derive(Debug)]
pub struct SignalSet {
    signals: Vec<ReplenishmentSignal>,
}

impl SignalSet {
    /// Creates `len` unsignaled wake-ups.
    pub fn new(len: usize) -> Self {
        Self {
            signals: (0..len).map(|_| ReplenishmentSignal::new()).collect(),
        }
    }

    /// Signal for `id`, if it is in the catalog.
    #[inline]
    pub fn get(&self, id: IngredientId) -> Option<&ReplenishmentSignal> {
        self.signals.get(id.index())
    }

    /// Posts a wake-up to the supplier of `id`. Unknown ids are ignored.
    #[inline]
    pub fn notify(&self, id: IngredientId) {
        if let Some(s) = self.get(id) {
            s.notify();
        }
    }

    /// Posts one wake-up to every signal.
    pub fn notify_all(&self) {
        for s in &self.signals {
            s.notify();
        }
    }

    /// Pending wake-ups for `id` (`0` for an unknown id).
    pub fn pending(&self, id: IngredientId) -> usize {
        self.get(id).map_or(0, ReplenishmentSignal::pending)
    }

    /// Number of signals.
    #[inline]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// True if there are no signals.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
