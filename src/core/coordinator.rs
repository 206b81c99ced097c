//! # Coordinator: spawns workers, drives shutdown, reports.
//!
//! The [`Coordinator`] owns the shared [`Pantry`], the recipe source and the
//! subscribers of one run. [`Coordinator::run`] executes the run to completion.
//!
//! ## High-level architecture
//! ```text
//! Preparation:
//!   - SubscriberSet::new(subscribers)
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! Spawn workers (one JoinSet each):
//!   Supplier[ingredient 0] ... Supplier[ingredient K-1]
//!   Consumer[0]            ... Consumer[N-1]
//!
//! Shutdown path:
//!   join every consumer (barrier)
//!     └─► Bus.publish(ShutdownRequested)
//!     └─► pantry.shutdown()   → cancel running token + notify every signal
//!     └─► join every supplier
//!     └─► Bus.publish(AllStopped) → listener forwards it, then drains subscribers
//!     └─► RunReport from the stockpile ledger
//! ```
//!
//! Shutdown is triggered only by exhaustion of consumer work. A worker panic
//! does not stop the run; it is reported as [`RuntimeError::WorkerPanicked`]
//! after every other worker has been joined.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pantry::{Config, Coordinator, Journal, Recipe, ScriptedRecipes, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let journal = Arc::new(Journal::new());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![journal.clone()];
//!
//!     let script = ScriptedRecipes::new(vec![vec![Recipe::new([3]), Recipe::new([2])]]);
//!     let report = Coordinator::builder(Config::single("Spice", 5, 0))
//!         .with_subscribers(subs)
//!         .with_recipes(Arc::new(script))
//!         .build()?
//!         .run()
//!         .await?;
//!
//!     assert_eq!(report.recipes_completed, 2);
//!     assert!(report.balanced());
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::config::Config;
use crate::core::builder::CoordinatorBuilder;
use crate::core::consumer::{Consumer, ConsumerExit, ConsumerParams};
use crate::core::pantry::Pantry;
use crate::core::supplier::Supplier;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::recipes::RecipeRef;
use crate::stock::{Catalog, LedgerEntry};
use crate::subscribers::{Subscribe, SubscriberSet, panic_message};

/// Final state of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Ingredient catalog (index = ingredient id).
    pub catalog: Catalog,
    /// Final quantity per ingredient.
    pub quantities: Vec<u32>,
    /// Accounting entry per ingredient.
    pub ledger: Vec<LedgerEntry>,
    /// Work units completed across all consumers.
    pub recipes_completed: u64,
    /// Batches credited across all suppliers.
    pub replenishments: u64,
    /// Consumers that stopped before finishing their work.
    pub consumers_cancelled: usize,
}

impl RunReport {
    /// True if `initial + credited - debited == quantity` for every ingredient.
    pub fn balanced(&self) -> bool {
        self.ledger.iter().all(LedgerEntry::balances)
    }

    /// Final quantity of the ingredient called `name`.
    pub fn quantity(&self, name: &str) -> Option<u32> {
        let id = self.catalog.id(name)?;
        self.quantities.get(id.index()).copied()
    }
}

/// Runs suppliers and consumers over one shared pantry.
pub struct Coordinator {
    cfg: Config,
    pantry: Arc<Pantry>,
    recipes: RecipeRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Coordinator {
    /// Returns a builder for `cfg`.
    pub fn builder(cfg: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        pantry: Arc<Pantry>,
        recipes: RecipeRef,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        Self {
            cfg,
            pantry,
            recipes,
            subscribers,
        }
    }

    /// Shared pantry of this run (stock can be inspected while it runs).
    pub fn pantry(&self) -> &Arc<Pantry> {
        &self.pantry
    }

    /// Runs until every consumer has finished, then shuts the suppliers down.
    ///
    /// Returns the final stock and counters, or the first worker panic.
    pub async fn run(self) -> Result<RunReport, RuntimeError> {
        let bus = self.pantry.bus().clone();
        let subs = SubscriberSet::new(self.subscribers.clone(), bus.clone());
        let listener = subscriber_listener(&bus, subs);

        tracing::debug!(
            ingredients = self.pantry.catalog().len(),
            consumers = self.cfg.consumers,
            acquisition = self.cfg.acquisition.as_label(),
            "pantry run starting"
        );

        let mut suppliers = JoinSet::new();
        self.spawn_suppliers(&mut suppliers);
        let mut consumers = JoinSet::new();
        self.spawn_consumers(&mut consumers);

        let mut first_panic: Option<RuntimeError> = None;
        let mut recipes_completed = 0u64;
        let mut consumers_cancelled = 0usize;
        while let Some(res) = consumers.join_next().await {
            match settle(res) {
                Ok(exit) => {
                    recipes_completed += u64::from(exit.units());
                    if matches!(exit, ConsumerExit::Cancelled { .. }) {
                        consumers_cancelled += 1;
                    }
                }
                Err(err) => record_panic(&mut first_panic, err),
            }
        }

        bus.publish(Event::new(EventKind::ShutdownRequested));
        self.pantry.shutdown();

        let mut replenishments = 0u64;
        while let Some(res) = suppliers.join_next().await {
            match settle(res) {
                Ok(credited) => replenishments += u64::from(credited),
                Err(err) => record_panic(&mut first_panic, err),
            }
        }

        bus.publish(Event::new(EventKind::AllStopped));
        if listener.await.is_err() {
            tracing::warn!("event listener ended abnormally");
        }

        if let Some(err) = first_panic {
            return Err(err);
        }
        let stock = self.pantry.stockpile();
        Ok(RunReport {
            catalog: self.pantry.catalog().clone(),
            quantities: stock.snapshot().await,
            ledger: stock.ledger().await,
            recipes_completed,
            replenishments,
            consumers_cancelled,
        })
    }

    fn spawn_suppliers(&self, set: &mut JoinSet<Result<u32, RuntimeError>>) {
        for id in self.pantry.catalog().ids() {
            let supplier = Supplier::new(Arc::clone(&self.pantry), id);
            let name = supplier.name().to_string();
            set.spawn(guarded(name, supplier.run()));
        }
    }

    fn spawn_consumers(&self, set: &mut JoinSet<Result<ConsumerExit, RuntimeError>>) {
        let params = ConsumerParams {
            backoff: self.cfg.backoff,
            acquisition: self.cfg.acquisition,
            consume_max: self.cfg.consume_bound(),
            wake_on_credit: self.cfg.wake_on_credit,
        };
        for index in 0..self.cfg.consumers {
            let consumer = Consumer::new(
                Arc::clone(&self.pantry),
                Arc::clone(&self.recipes),
                index,
                params.clone(),
            );
            let name = consumer.name().to_string();
            set.spawn(guarded(name, consumer.run()));
        }
    }
}

/// Subscribes to the bus and forwards events to the subscriber set.
///
/// Stops after forwarding the terminal event, then drains every subscriber.
fn subscriber_listener(bus: &Bus, subs: SubscriberSet) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let last = ev.is_terminal();
                    subs.emit(&ev);
                    if last {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event listener lagged; events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        subs.shutdown().await;
    })
}

/// Runs a worker future, turning a panic into [`RuntimeError::WorkerPanicked`].
async fn guarded<T>(worker: String, fut: impl Future<Output = T>) -> Result<T, RuntimeError> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|panic| RuntimeError::WorkerPanicked {
            worker,
            info: panic_message(&*panic),
        })
}

fn settle<T>(res: Result<Result<T, RuntimeError>, JoinError>) -> Result<T, RuntimeError> {
    match res {
        Ok(inner) => inner,
        Err(err) => Err(RuntimeError::WorkerPanicked {
            worker: "unknown".to_string(),
            info: err.to_string(),
        }),
    }
}

fn record_panic(first: &mut Option<RuntimeError>, err: RuntimeError) {
    tracing::error!(error = %err, label = err.as_label(), "worker failed");
    first.get_or_insert(err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::{Recipe, RecipeSource, ScriptedRecipes};
    use crate::stock::IngredientId;
    use crate::subscribers::Journal;

    struct Exploding;

    impl RecipeSource for Exploding {
        fn work_units(&self, consumer: usize) -> u32 {
            if consumer == 1 {
                panic!("bad workload");
            }
            1
        }

        fn recipe(&self, _consumer: usize, _unit: u32) -> Recipe {
            Recipe::new([1])
        }
    }

    #[tokio::test]
    async fn single_consumer_run_reports_ledger() {
        let journal = Arc::new(Journal::new());
        let subs: Vec<Arc<dyn Subscribe>> = vec![journal.clone()];
        let script = ScriptedRecipes::new(vec![vec![Recipe::new([5]), Recipe::new([3])]]);

        let report = Coordinator::builder(Config::single("Spice", 5, 0))
            .with_subscribers(subs)
            .with_recipes(Arc::new(script))
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.recipes_completed, 2);
        assert_eq!(report.consumers_cancelled, 0);
        assert!(report.balanced());
        assert_eq!(report.ledger[0].debited, 8);
        assert_eq!(
            u64::from(report.quantities[0]),
            report.ledger[0].credited - 8
        );
        assert_eq!(report.quantity("Spice"), Some(report.quantities[0]));

        let events = journal.events();
        assert_eq!(events.last().map(|e| e.kind), Some(EventKind::AllStopped));
        assert_eq!(journal.count(EventKind::ConsumerDone), 1);
        assert_eq!(journal.count(EventKind::SupplierDone), 1);
    }

    #[tokio::test]
    async fn build_rejects_invalid_config() {
        let mut cfg = Config::default();
        cfg.ingredients.clear();
        assert!(Coordinator::builder(cfg).build().is_err());
    }

    #[tokio::test]
    async fn panicking_consumer_is_reported_after_shutdown() {
        let mut cfg = Config::single("Spice", 5, 0);
        cfg.consumers = 3;
        let coord = Coordinator::builder(cfg)
            .with_recipes(Arc::new(Exploding))
            .build()
            .unwrap();
        let pantry = Arc::clone(coord.pantry());

        let err = coord.run().await.unwrap_err();
        assert_eq!(
            err,
            RuntimeError::WorkerPanicked {
                worker: "consumer-2".into(),
                info: "bad workload".into(),
            }
        );
        assert!(!pantry.is_running());
        assert!(pantry.stockpile().ledger().await[0].balances());
        assert_eq!(pantry.catalog().name(IngredientId::new(0)), "Spice");
    }
}
