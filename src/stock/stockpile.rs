//! # Shared stockpile: one lock around every ingredient quantity.
//!
//! [`Stockpile`] owns the per-ingredient quantities and an accounting ledger
//! behind a single [`tokio::sync::Mutex`]. Every read and write goes through a
//! [`StockGuard`], so callers that must act on a result *within the same
//! critical section* (the depleted → notify hand-off) can do so before the lock
//! is released.
//!
//! ## Rules
//! - Quantities are `u32` and a debit is applied only when `quantity >= amount`;
//!   stock is never negative.
//! - Nothing awaits while a [`StockGuard`] is held except acquiring it.
//! - The ledger tracks, per ingredient, `initial + credited - debited == quantity`.
//!
//! ```text
//! consumer ─► lock ─► try_debit ─┬─ Taken{remaining: 0} ─► notify supplier ─► unlock
//!                                ├─ Taken{remaining: n} ─────────────────────► unlock
//!                                └─ Short{available}    ─► (maybe notify) ───► unlock
//! supplier ─► lock ─► credit(batch) ─► unlock
//! ```

use tokio::sync::{Mutex, MutexGuard};

use crate::stock::ingredient::{IngredientId, IngredientSpec};

/// Outcome of a single debit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Debit {
    /// The amount was removed; `remaining` is what is left.
    Taken {
        /// Quantity left after the debit.
        remaining: u32,
    },
    /// Not enough stock; nothing was changed.
    Short {
        /// Quantity currently on hand.
        available: u32,
    },
}

impl Debit {
    /// True when this debit moved the quantity from positive to zero.
    #[inline]
    pub fn depleted(&self) -> bool {
        matches!(self, Debit::Taken { remaining: 0 })
    }

    /// True when the debit was applied.
    #[inline]
    pub fn is_taken(&self) -> bool {
        matches!(self, Debit::Taken { .. })
    }
}

/// Accounting snapshot for one ingredient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Stock present at startup.
    pub initial: u32,
    /// Current quantity.
    pub quantity: u32,
    /// Sum of all credited amounts.
    pub credited: u64,
    /// Sum of all successfully debited amounts.
    pub debited: u64,
    /// Number of credit operations.
    pub credits: u64,
    /// Number of successful debit operations.
    pub debits: u64,
}

impl LedgerEntry {
    /// True when `initial + credited - debited == quantity`.
    pub fn balances(&self) -> bool {
        u64::from(self.initial) + self.credited == self.debited + u64::from(self.quantity)
    }
}

#[derive(Debug)]
struct Bin {
    quantity: u32,
    initial: u32,
    credited: u64,
    debited: u64,
    credits: u64,
    debits: u64,
    shortfall: bool,
}

impl Bin {
    fn new(initial: u32) -> Self {
        Self {
            quantity: initial,
            initial,
            credited: 0,
            debited: 0,
            credits: 0,
            debits: 0,
            shortfall: false,
        }
    }

    fn entry(&self) -> LedgerEntry {
        LedgerEntry {
            initial: self.initial,
            quantity: self.quantity,
            credited: self.credited,
            debited: self.debited,
            credits: self.credits,
            debits: self.debits,
        }
    }
}

/// Mutex-guarded quantities for every ingredient in the catalog.
#[derive(Debug)]
pub struct Stockpile {
    bins: Mutex<Vec<Bin>>,
}

impl Stockpile {
    /// Creates a stockpile seeded with each spec's initial quantity.
    pub fn new(specs: &[IngredientSpec]) -> Self {
        Self::with_quantities(specs.iter().map(|s| s.initial))
    }

    /// Creates a stockpile from raw starting quantities (index = ingredient id).
    pub fn with_quantities(initial: impl IntoIterator<Item = u32>) -> Self {
        Self {
            bins: Mutex::new(initial.into_iter().map(Bin::new).collect()),
        }
    }

    /// Acquires the stockpile lock.
    pub async fn lock(&self) -> StockGuard<'_> {
        StockGuard {
            bins: self.bins.lock().await,
        }
    }

    /// Locks, attempts one debit, unlocks.
    pub async fn try_debit(&self, id: IngredientId, amount: u32) -> Debit {
        self.lock().await.try_debit(id, amount)
    }

    /// Locks, credits `amount`, unlocks. Returns the new quantity.
    pub async fn credit(&self, id: IngredientId, amount: u32) -> u32 {
        self.lock().await.credit(id, amount)
    }

    /// Current quantity of `id` (read under the lock).
    pub async fn quantity(&self, id: IngredientId) -> u32 {
        self.lock().await.quantity(id)
    }

    /// All quantities in catalog order.
    pub async fn snapshot(&self) -> Vec<u32> {
        self.lock().await.snapshot()
    }

    /// Accounting entries in catalog order.
    pub async fn ledger(&self) -> Vec<LedgerEntry> {
        self.lock().await.ledger()
    }
}

/// Exclusive access to the stockpile for the lifetime of the guard.
pub struct StockGuard<'a> {
    bins: MutexGuard<'a, Vec<Bin>>,
}

impl StockGuard<'_> {
    /// Removes `amount` if at least that much is on hand.
    ///
    /// An id outside the catalog is reported as `Short { available: 0 }`.
    pub fn try_debit(&mut self, id: IngredientId, amount: u32) -> Debit {
        let Some(bin) = self.bins.get_mut(id.index()) else {
            return Debit::Short { available: 0 };
        };
        match bin.quantity.checked_sub(amount) {
            Some(remaining) => {
                bin.quantity = remaining;
                bin.debited += u64::from(amount);
                bin.debits += 1;
                Debit::Taken { remaining }
            }
            None => Debit::Short {
                available: bin.quantity,
            },
        }
    }

    /// Debits every `(id, amount)` pair or none of them.
    ///
    /// `Ok` carries `(id, remaining)` per requirement; `Err` carries
    /// `(id, available)` for each requirement that could not be met.
    pub fn try_debit_all(
        &mut self,
        wants: &[(IngredientId, u32)],
    ) -> Result<Vec<(IngredientId, u32)>, Vec<(IngredientId, u32)>> {
        // Demand is summed per id so a repeated id cannot pass the check twice.
        let mut demand = vec![0u64; self.bins.len()];
        let mut short = Vec::new();
        for &(id, amount) in wants {
            match demand.get_mut(id.index()) {
                Some(d) => *d += u64::from(amount),
                None => short.push((id, 0)),
            }
        }
        for (index, (&need, bin)) in demand.iter().zip(self.bins.iter()).enumerate() {
            if need > u64::from(bin.quantity) {
                short.push((IngredientId::new(index), bin.quantity));
            }
        }
        if !short.is_empty() {
            return Err(short);
        }

        let taken = wants
            .iter()
            .filter_map(|&(id, amount)| match self.try_debit(id, amount) {
                Debit::Taken { remaining } => Some((id, remaining)),
                Debit::Short { .. } => None,
            })
            .collect();
        Ok(taken)
    }

    /// Adds `amount` and clears any flagged shortfall.
    ///
    /// Stock is capped at `u32::MAX`; only the part that fits is applied and
    /// recorded in the ledger. Returns the new quantity; an id outside the
    /// catalog is ignored (returns `0`).
    pub fn credit(&mut self, id: IngredientId, amount: u32) -> u32 {
        let Some(bin) = self.bins.get_mut(id.index()) else {
            tracing::warn!(ingredient = %id, "credit for unknown ingredient ignored");
            return 0;
        };
        let applied = amount.min(u32::MAX - bin.quantity);
        if applied < amount {
            tracing::warn!(
                ingredient = %id,
                requested = amount,
                applied,
                "credit clamped at stock capacity"
            );
        }
        bin.quantity += applied;
        bin.credited += u64::from(applied);
        bin.credits += 1;
        bin.shortfall = false;
        bin.quantity
    }

    /// Current quantity (`0` for an unknown id).
    #[inline]
    pub fn quantity(&self, id: IngredientId) -> u32 {
        self.bins.get(id.index()).map_or(0, |b| b.quantity)
    }

    /// Marks that a consumer is waiting for more than is on hand.
    pub fn flag_shortfall(&mut self, id: IngredientId) {
        if let Some(bin) = self.bins.get_mut(id.index()) {
            bin.shortfall = true;
        }
    }

    /// True if a shortfall was flagged since the last credit.
    #[inline]
    pub fn shortfall(&self, id: IngredientId) -> bool {
        self.bins.get(id.index()).is_some_and(|b| b.shortfall)
    }

    /// All quantities in catalog order.
    pub fn snapshot(&self) -> Vec<u32> {
        self.bins.iter().map(|b| b.quantity).collect()
    }

    /// Accounting entries in catalog order.
    pub fn ledger(&self) -> Vec<LedgerEntry> {
        self.bins.iter().map(Bin::entry).collect()
    }
}
