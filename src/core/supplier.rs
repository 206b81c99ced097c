//! # Supplier: restocks one ingredient.
//!
//! One supplier runs per ingredient. It sleeps on its replenishment signal
//! while stock is on hand and credits its fixed batch whenever it finds the
//! ingredient empty (or, under `ResupplyPolicy::OnShortfall`, flagged short).
//!
//! ## State machine
//! ```text
//!            ┌──────────────── Signaled ────────────────┐
//!            ▼                                          │
//!   Idle ── restock() ──► NotNeeded ──► Waiting ── wait(token)
//!    ▲          │                                       │
//!    │          ├──► Credited ──► publish Replenished ──┘ (back to Idle)
//!    │          │
//!    └──────────┴──► Stopped ─────────────┐    Cancelled
//!                                         ▼        │
//!                                    Terminated ◄──┘ ──► publish SupplierDone
//! ```
//!
//! At startup with zero stock the first `restock()` credits straight away; no
//! signal is needed.

use std::sync::Arc;

use crate::core::pantry::{Pantry, Restock};
use crate::events::{Event, EventKind};
use crate::stock::{IngredientId, Wakeup};

/// Restocking worker for a single ingredient.
pub struct Supplier {
    id: IngredientId,
    name: Arc<str>,
    pantry: Arc<Pantry>,
}

impl Supplier {
    /// Creates the supplier for `id`.
    pub fn new(pantry: Arc<Pantry>, id: IngredientId) -> Self {
        let name = format!("supplier:{}", pantry.catalog().name(id)).into();
        Self { id, name, pantry }
    }

    /// Worker name used in events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs until the pantry's running token is cancelled.
    ///
    /// Returns the number of batches credited.
    pub async fn run(self) -> u32 {
        let Some(signal) = self.pantry.signals().get(self.id) else {
            tracing::warn!(ingredient = %self.id, "supplier without a signal; exiting");
            return 0;
        };
        let ingredient = self.pantry.catalog().name_arc(self.id);
        let batch = self.pantry.batch(self.id);
        let mut replenishments = 0u32;

        loop {
            match self.pantry.restock(self.id).await {
                Restock::Credited { on_hand } => {
                    replenishments += 1;
                    self.pantry.bus().publish(
                        Event::new(EventKind::Replenished)
                            .with_worker(Arc::clone(&self.name))
                            .with_ingredient(Arc::clone(&ingredient))
                            .with_amount(batch)
                            .with_remaining(on_hand),
                    );
                }
                Restock::NotNeeded => match signal.wait(self.pantry.token()).await {
                    Wakeup::Signaled => {}
                    Wakeup::Cancelled => break,
                },
                Restock::Stopped => break,
            }
        }

        self.pantry.bus().publish(
            Event::new(EventKind::SupplierDone)
                .with_worker(Arc::clone(&self.name))
                .with_ingredient(ingredient)
                .with_units(replenishments),
        );
        replenishments
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::events::Bus;

    const SPICE: IngredientId = IngredientId::new(0);

    #[tokio::test]
    async fn credits_at_startup_then_waits() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 4, 0), Bus::new(64)));
        let handle = tokio::spawn(Supplier::new(Arc::clone(&pantry), SPICE).run());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pantry.stockpile().quantity(SPICE).await, 4);

        pantry.shutdown();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn restocks_after_depletion_signal() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 2), Bus::new(64)));
        let handle = tokio::spawn(Supplier::new(Arc::clone(&pantry), SPICE).run());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(pantry.stockpile().quantity(SPICE).await, 2);

        assert_eq!(
            pantry.take("consumer-1", SPICE, 2).await,
            crate::stock::Debit::Taken { remaining: 0 }
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pantry.stockpile().quantity(SPICE).await, 3);

        pantry.shutdown();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn stops_promptly_while_waiting() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 7), Bus::new(64)));
        let mut rx = pantry.bus().subscribe();
        let handle = tokio::spawn(Supplier::new(Arc::clone(&pantry), SPICE).run());

        tokio::time::sleep(Duration::from_millis(5)).await;
        pantry.shutdown();
        let credited = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("supplier did not stop")
            .unwrap();
        assert_eq!(credited, 0);

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SupplierDone);
        assert_eq!(ev.worker.as_deref(), Some("supplier:Spice"));
        assert_eq!(ev.units, Some(0));
    }
}
