//! # pantry
//!
//! **Pantry** is a shared-stockpile contention runtime: a fixed set of
//! suppliers keeps ingredients in stock while a pool of consumers acquires
//! randomly generated recipes from the same mutex-guarded stockpile.
//!
//! It models the classic producer/consumer coordination problem with
//! explicit, testable parts: edge-triggered replenishment signals, bounded
//! retry with backoff, cooperative cancellation and an observable event stream.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐        ┌──────────────┐
//!     │  Supplier    │   │  Supplier    │  ...   │  Supplier    │   one per ingredient
//!     │ (ingredient) │   │ (ingredient) │        │ (ingredient) │
//!     └──────┬───────┘   └──────┬───────┘        └──────┬───────┘
//!            │ credit(batch)    │ wait(signal)          │
//!            ▼                  ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Pantry (Arc, shared by every worker)                             │
//! │  - Stockpile (tokio Mutex: quantity + ledger per ingredient)      │
//! │  - SignalSet (one counting ReplenishmentSignal per ingredient)    │
//! │  - CancellationToken (running flag)                               │
//! │  - Bus (broadcast events)                                         │
//! └──────▲──────────────────▲──────────────────────▲──────────────────┘
//!        │ take / take_all  │                      │
//!     ┌──┴───────────┐   ┌──┴───────────┐       ┌──┴───────────┐
//!     │  Consumer    │   │  Consumer    │  ...  │  Consumer    │   N consumers
//!     │ (recipes +   │   │ (recipes +   │       │ (recipes +   │
//!     │  backoff)    │   │  backoff)    │       │  backoff)    │
//!     └──────────────┘   └──────────────┘       └──────────────┘
//!
//!   Bus ──► coordinator listener ──► SubscriberSet ──► LogWriter / Journal / custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! Coordinator::run()
//!   ├─► spawn suppliers, spawn consumers
//!   ├─► join consumers               (all work units done)
//!   ├─► publish ShutdownRequested
//!   ├─► cancel token + notify every signal
//!   ├─► join suppliers
//!   ├─► publish AllStopped, drain subscribers
//!   └─► RunReport { quantities, ledger, recipes_completed, replenishments }
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Runtime**       | Spawn workers, drive shutdown, report the ledger.        | [`Coordinator`], [`RunReport`]              |
//! | **Stock**         | Mutex-guarded quantities and replenishment signals.      | [`Stockpile`], [`ReplenishmentSignal`]      |
//! | **Workload**      | Random or scripted recipes per consumer.                 | [`RecipeSource`], [`RandomRecipes`]         |
//! | **Policies**      | Retry delay, acquisition and restock strategies.         | [`BackoffPolicy`], [`AcquisitionStrategy`]  |
//! | **Subscriber API**| Observe the event stream.                                | [`Subscribe`], [`Journal`]                  |
//! | **Errors**        | Typed configuration and runtime errors.                  | [`ConfigError`], [`RuntimeError`]           |
//! | **Configuration** | Centralize run settings.                                 | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports the tracing-backed [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pantry::{Config, Coordinator, ResupplyPolicy, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::tea_party();
//!     cfg.consumers = 3;
//!     cfg.recipes_per_consumer = 2..=4;
//!     cfg.resupply = ResupplyPolicy::OnShortfall;
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(pantry::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let report = Coordinator::builder(cfg)
//!         .with_subscribers(subs)
//!         .build()?
//!         .run()
//!         .await?;
//!
//!     assert!(report.balanced());
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod policies;
mod recipes;
mod stock;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, TEA_PARTY_INGREDIENTS};
pub use self::core::{
    Consumer, ConsumerExit, ConsumerParams, Coordinator, CoordinatorBuilder, Pantry, Restock,
    RunReport, Supplier,
};
pub use error::{ConfigError, RuntimeError};
pub use events::{Bus, Event, EventKind, ResupplyCause};
pub use policies::{AcquisitionStrategy, BackoffPolicy, JitterPolicy, ResupplyPolicy};
pub use recipes::{RandomRecipes, Recipe, RecipeBounds, RecipeRef, RecipeSource, ScriptedRecipes};
pub use stock::{
    Catalog, Debit, IngredientId, IngredientSpec, LedgerEntry, ReplenishmentSignal, SignalSet,
    StockGuard, Stockpile, Wakeup,
};
pub use subscribers::{Journal, Subscribe, SubscriberSet};

// Optional: expose the built-in tracing logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
