//! # Pantry: shared state handle for one run.
//!
//! [`Pantry`] bundles everything workers share: the ingredient catalog, the
//! mutex-guarded [`Stockpile`], one [`ReplenishmentSignal`](crate::ReplenishmentSignal)
//! per ingredient, the running token and the event bus. It is created once by the
//! coordinator and handed to every worker as `Arc<Pantry>`.
//!
//! ## Signaling rules
//! Every stock mutation that may need a supplier posts the signal **under the
//! same lock acquisition** as the debit that caused it:
//!
//! ```text
//! consumer                         stockpile lock          supplier
//!   take(id, n) ──► lock ──► try_debit ──► remaining == 0 ──► signals.notify(id)
//!                             └─ Short { available } ──► (policy) notify(id)
//!                   unlock
//!                                                          restock(id)
//!                                                            lock ──► qty == 0 | shortfall?
//!                                                                 ──► credit(batch)
//!                                                            unlock ──► restocked.notify_waiters()
//! ```
//!
//! Redundant notifies are benign: the supplier re-checks the stock under the lock
//! after every wake-up.

use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::{Bus, Event, EventKind, ResupplyCause};
use crate::policies::ResupplyPolicy;
use crate::stock::{Catalog, Debit, IngredientId, SignalSet, StockGuard, Stockpile};

/// Outcome of a supplier's restock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restock {
    /// The batch was credited; carries the new quantity.
    Credited {
        /// Quantity on hand after the credit.
        on_hand: u32,
    },
    /// Stock is positive and nobody flagged a shortfall.
    NotNeeded,
    /// The running token is cancelled.
    Stopped,
}

/// Shared state of a pantry run.
#[derive(Debug)]
pub struct Pantry {
    catalog: Catalog,
    batches: Vec<u32>,
    stock: Stockpile,
    signals: SignalSet,
    restocked: Notify,
    token: CancellationToken,
    bus: Bus,
    resupply: ResupplyPolicy,
}

impl Pantry {
    /// Creates the pantry for `cfg`, publishing on `bus`.
    ///
    /// Stock starts at each ingredient's initial quantity and every signal
    /// starts unsignaled.
    pub fn new(cfg: &Config, bus: Bus) -> Self {
        Self {
            catalog: cfg.catalog(),
            batches: cfg.ingredients.iter().map(|s| s.batch).collect(),
            stock: Stockpile::new(&cfg.ingredients),
            signals: SignalSet::new(cfg.ingredients.len()),
            restocked: Notify::new(),
            token: CancellationToken::new(),
            bus,
            resupply: cfg.resupply,
        }
    }

    /// Ingredient catalog.
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutex-guarded stock.
    #[inline]
    pub fn stockpile(&self) -> &Stockpile {
        &self.stock
    }

    /// Per-ingredient replenishment signals.
    #[inline]
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    /// Running token; cancelled exactly once during shutdown.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Event bus.
    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Batch size of the supplier for `id` (`0` for an unknown id).
    #[inline]
    pub fn batch(&self, id: IngredientId) -> u32 {
        self.batches.get(id.index()).copied().unwrap_or(0)
    }

    /// True until shutdown cancels the running token.
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Future resolving on the next credit (used by `wake_on_credit`).
    ///
    /// Only waiters registered before the credit are woken, so create it
    /// before releasing the lock you checked the stock under.
    pub fn restocked(&self) -> Notified<'_> {
        self.restocked.notified()
    }

    /// Attempts to debit `amount` of `id`, notifying the supplier when needed.
    pub async fn take(&self, worker: &str, id: IngredientId, amount: u32) -> Debit {
        let mut stock = self.stock.lock().await;
        let debit = stock.try_debit(id, amount);
        match debit {
            Debit::Taken { remaining: 0 } if amount > 0 => {
                self.request_resupply(worker, id, ResupplyCause::Depleted);
            }
            Debit::Short { available } => self.on_short(&mut stock, worker, id, available),
            Debit::Taken { .. } => {}
        }
        debit
    }

    /// Attempts to debit every requirement in one critical section.
    ///
    /// On success the depleted ingredients are notified; on failure every
    /// short ingredient is treated like a failed [`take`](Self::take).
    pub async fn take_all(
        &self,
        worker: &str,
        wants: &[(IngredientId, u32)],
    ) -> Result<Vec<(IngredientId, u32)>, Vec<(IngredientId, u32)>> {
        let mut stock = self.stock.lock().await;
        let res = stock.try_debit_all(wants);
        match &res {
            Ok(taken) => {
                for (&(id, remaining), &(_, amount)) in taken.iter().zip(wants) {
                    if remaining == 0 && amount > 0 {
                        self.request_resupply(worker, id, ResupplyCause::Depleted);
                    }
                }
            }
            Err(short) => {
                for &(id, available) in short {
                    self.on_short(&mut stock, worker, id, available);
                }
            }
        }
        res
    }

    /// Credits the supplier batch for `id` if the stock needs it.
    ///
    /// Stock needs a restock when it is empty or a consumer flagged a shortfall.
    /// Consumers waiting on [`restocked`](Self::restocked) are woken after the
    /// lock is released.
    pub async fn restock(&self, id: IngredientId) -> Restock {
        let mut stock = self.stock.lock().await;
        if self.token.is_cancelled() {
            return Restock::Stopped;
        }
        if stock.quantity(id) > 0 && !stock.shortfall(id) {
            return Restock::NotNeeded;
        }
        let on_hand = stock.credit(id, self.batch(id));
        drop(stock);

        self.restocked.notify_waiters();
        Restock::Credited { on_hand }
    }

    /// Cancels the running token and wakes every supplier once.
    pub fn shutdown(&self) {
        self.token.cancel();
        self.signals.notify_all();
    }

    fn on_short(&self, stock: &mut StockGuard<'_>, worker: &str, id: IngredientId, available: u32) {
        if !self.resupply.wakes_on_short(available) {
            return;
        }
        if available > 0 {
            stock.flag_shortfall(id);
        }
        self.request_resupply(worker, id, ResupplyCause::Starved);
    }

    fn request_resupply(&self, worker: &str, id: IngredientId, cause: ResupplyCause) {
        self.signals.notify(id);
        self.bus.publish(
            Event::new(EventKind::ResupplyRequested)
                .with_worker(worker)
                .with_ingredient(self.catalog.name_arc(id))
                .with_cause(cause),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::IngredientSpec;

    fn pantry(batch: u32, initial: u32, resupply: ResupplyPolicy) -> Pantry {
        let mut cfg = Config::single("Spice", batch, initial);
        cfg.resupply = resupply;
        Pantry::new(&cfg, Bus::new(64))
    }

    const SPICE: IngredientId = IngredientId::new(0);

    #[tokio::test]
    async fn depleting_debit_posts_one_signal() {
        let p = pantry(5, 3, ResupplyPolicy::OnDepletion);
        let mut rx = p.bus().subscribe();

        assert_eq!(p.take("c", SPICE, 2).await, Debit::Taken { remaining: 1 });
        assert_eq!(p.signals().pending(SPICE), 0);

        assert_eq!(p.take("c", SPICE, 1).await, Debit::Taken { remaining: 0 });
        assert_eq!(p.signals().pending(SPICE), 1);

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ResupplyRequested);
        assert_eq!(ev.cause, Some(ResupplyCause::Depleted));
        assert_eq!(ev.ingredient.as_deref(), Some("Spice"));
    }

    #[tokio::test]
    async fn positive_shortfall_is_silent_on_depletion_policy() {
        let p = pantry(1, 2, ResupplyPolicy::OnDepletion);
        assert_eq!(p.take("c", SPICE, 4).await, Debit::Short { available: 2 });
        assert_eq!(p.signals().pending(SPICE), 0);
        assert_eq!(p.restock(SPICE).await, Restock::NotNeeded);
    }

    #[tokio::test]
    async fn shortfall_policy_flags_and_restocks() {
        let p = pantry(1, 2, ResupplyPolicy::OnShortfall);
        assert_eq!(p.take("c", SPICE, 4).await, Debit::Short { available: 2 });
        assert_eq!(p.signals().pending(SPICE), 1);

        assert_eq!(p.restock(SPICE).await, Restock::Credited { on_hand: 3 });
        // Credit clears the flag.
        assert_eq!(p.restock(SPICE).await, Restock::NotNeeded);
    }

    #[tokio::test]
    async fn starved_at_zero_notifies_every_look() {
        let p = pantry(5, 0, ResupplyPolicy::OnDepletion);
        p.take("c", SPICE, 1).await;
        p.take("c", SPICE, 1).await;
        assert_eq!(p.signals().pending(SPICE), 2);
    }

    #[tokio::test]
    async fn take_all_debits_everything_or_nothing() {
        let cfg = Config {
            ingredients: vec![
                IngredientSpec::new("Green Tea Leaf", 3).with_initial(1),
                IngredientSpec::new("Spice", 3).with_initial(2),
            ],
            ..Config::default()
        };
        let p = Pantry::new(&cfg, Bus::new(64));
        let (tea, spice) = (IngredientId::new(0), IngredientId::new(1));

        let short = p.take_all("c", &[(tea, 2), (spice, 1)]).await.unwrap_err();
        assert_eq!(short, vec![(tea, 1)]);
        assert_eq!(p.stockpile().snapshot().await, vec![1, 2]);

        let taken = p.take_all("c", &[(tea, 1), (spice, 1)]).await.unwrap();
        assert_eq!(taken, vec![(tea, 0), (spice, 1)]);
        assert_eq!(p.signals().pending(tea), 1);
        assert_eq!(p.signals().pending(spice), 0);
    }

    #[tokio::test]
    async fn restock_stops_after_shutdown() {
        let p = pantry(5, 0, ResupplyPolicy::OnDepletion);
        assert_eq!(p.restock(SPICE).await, Restock::Credited { on_hand: 5 });
        p.shutdown();
        assert!(!p.is_running());
        assert_eq!(p.restock(SPICE).await, Restock::Stopped);
        assert_eq!(p.signals().pending(SPICE), 1);
    }
}
