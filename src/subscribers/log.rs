//! # LogWriter: events as `tracing` records.
//!
//! Renders each [`Event`] as one structured `tracing` record under the
//! `pantry` target. Noisy per-retry events go to `trace`, per-ingredient
//! events to `debug`, the narrative (requests, restocks, completions,
//! shutdown) to `info`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO pantry: requesting recipe worker="consumer-3" unit=1 recipe="1 Green Tea Leaf, 0 Black Tea Leaf, 2 Bergamot Oil, ..."
//! INFO pantry: replenished worker="supplier:Bergamot Oil" ingredient="Bergamot Oil" added=7 on_hand=7
//! INFO pantry: recipe prepared worker="consumer-3" unit=1
//! INFO pantry: consumer done worker="consumer-3" units=17 reason="exhausted"
//! INFO pantry: supplier done worker="supplier:Spice" replenishments=41
//! ```

use async_trait::async_trait;
use tracing::{debug, info, trace, warn};

use crate::events::{Event, EventKind};
use crate::stock::Catalog;
use crate::subscribers::Subscribe;

/// Tracing-backed event writer.
#[derive(Default)]
pub struct LogWriter {
    catalog: Option<Catalog>,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self { catalog: None }
    }

    /// Names recipe entries with the catalog instead of listing bare amounts.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    fn recipe_text(&self, e: &Event) -> String {
        match (&e.recipe, &self.catalog) {
            (Some(r), Some(c)) => r.describe(c),
            (Some(r), None) => format!("{:?}", r.amounts()),
            (None, _) => String::new(),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("-");
        let ingredient = e.ingredient.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::RecipeRequested => {
                info!(target: "pantry", worker, unit = e.attempt, recipe = %self.recipe_text(e), "requesting recipe");
            }
            EventKind::IngredientTaken => {
                debug!(target: "pantry", worker, ingredient, taken = e.amount, on_hand = e.remaining, "ingredient taken");
            }
            EventKind::AcquireRetry => {
                trace!(target: "pantry", worker, ingredient, on_hand = e.remaining, retry = e.attempt, delay_ms = e.delay_ms, "waiting for stock");
            }
            EventKind::RecipeCompleted => {
                info!(target: "pantry", worker, unit = e.attempt, "recipe prepared");
            }
            EventKind::ConsumerDone => {
                info!(target: "pantry", worker, units = e.units, reason = e.reason.as_deref().unwrap_or("-"), "consumer done");
            }
            EventKind::ResupplyRequested => {
                debug!(target: "pantry", worker, ingredient, cause = ?e.cause, "resupply requested");
            }
            EventKind::Replenished => {
                info!(target: "pantry", worker, ingredient, added = e.amount, on_hand = e.remaining, "replenished");
            }
            EventKind::SupplierDone => {
                info!(target: "pantry", worker, replenishments = e.units, "supplier done");
            }
            EventKind::ShutdownRequested => {
                info!(target: "pantry", "consumers finished, stopping suppliers");
            }
            EventKind::AllStopped => {
                info!(target: "pantry", "all workers stopped");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "pantry", subscriber = worker, reason = e.reason.as_deref().unwrap_or("-"), "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "pantry", subscriber = worker, info = e.reason.as_deref().unwrap_or("unknown"), "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}
