//! Shared stock: ingredients, the locked stockpile and replenishment signals.
//!
//! ## Contents
//! - [`IngredientId`], [`IngredientSpec`], [`Catalog`] ingredient identities and names
//! - [`Stockpile`], [`StockGuard`], [`Debit`], [`LedgerEntry`] mutex-guarded quantities
//! - [`ReplenishmentSignal`], [`SignalSet`], [`Wakeup`] per-ingredient counting wake-ups

mod ingredient;
mod signal;
mod stockpile;

pub use ingredient::{Catalog, IngredientId, IngredientSpec};
pub use signal::{ReplenishmentSignal, SignalSet, Wakeup};
pub use stockpile::{Debit, LedgerEntry, StockGuard, Stockpile};
