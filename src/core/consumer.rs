//! # Consumer: turns recipes into debits.
//!
//! A consumer runs a fixed number of work units. For each one it asks its
//! [`RecipeSource`](crate::RecipeSource) for a recipe, acquires the ingredients
//! with the configured [`AcquisitionStrategy`], then pauses for a random
//! "consumption" delay.
//!
//! ## Event flow
//! ```text
//! RecipeRequested
//!   └─► (per ingredient, Sequential)        (whole recipe, AllOrNothing)
//!         take() ── Short ──► AcquireRetry ──► backoff ──► take() ...
//!               └─ Taken ──► IngredientTaken
//!   └─► RecipeCompleted ──► consume pause
//! ... ──► ConsumerDone { units, reason }
//! ```
//!
//! ## Rules
//! - The stockpile lock is never held across a wait.
//! - Partially acquired ingredients are kept under `Sequential`.
//! - Every wait (backoff, consumption) races the running token.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::{select, time};

use crate::core::pantry::Pantry;
use crate::events::{Event, EventKind};
use crate::policies::{AcquisitionStrategy, BackoffPolicy};
use crate::recipes::{Recipe, RecipeRef};
use crate::stock::{Debit, IngredientId};

/// Parameters shared by every consumer of a run.
#[derive(Clone, Debug)]
pub struct ConsumerParams {
    /// Delay between looks while short of an ingredient.
    pub backoff: BackoffPolicy,
    /// Recipe acquisition strategy.
    pub acquisition: AcquisitionStrategy,
    /// Upper bound of the post-recipe pause (`None` = no pause).
    pub consume_max: Option<Duration>,
    /// End a backoff wait early when any supplier credits.
    pub wake_on_credit: bool,
}

/// How a consumer finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerExit {
    /// Every work unit was completed.
    Exhausted {
        /// Completed work units.
        units: u32,
    },
    /// The running token was cancelled first.
    Cancelled {
        /// Completed work units.
        units: u32,
    },
}

impl ConsumerExit {
    /// Completed work units.
    pub fn units(&self) -> u32 {
        match *self {
            ConsumerExit::Exhausted { units } | ConsumerExit::Cancelled { units } => units,
        }
    }

    /// Short stable label, used as the `ConsumerDone` reason.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConsumerExit::Exhausted { .. } => "exhausted",
            ConsumerExit::Cancelled { .. } => "cancelled",
        }
    }
}

/// Result of waiting for something.
enum Flow {
    Continue,
    Cancelled,
}

/// Consumer worker.
pub struct Consumer {
    index: usize,
    name: Arc<str>,
    pantry: Arc<Pantry>,
    recipes: RecipeRef,
    params: ConsumerParams,
}

impl Consumer {
    /// Creates consumer number `index` (0-based; named `consumer-{index + 1}`).
    pub fn new(
        pantry: Arc<Pantry>,
        recipes: RecipeRef,
        index: usize,
        params: ConsumerParams,
    ) -> Self {
        Self {
            index,
            name: format!("consumer-{}", index + 1).into(),
            pantry,
            recipes,
            params,
        }
    }

    /// Worker name used in events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs every work unit, or until cancelled.
    pub async fn run(self) -> ConsumerExit {
        let units = self.recipes.work_units(self.index);
        let mut completed = 0u32;
        let mut cancelled = false;

        for unit in 0..units {
            if !self.pantry.is_running() {
                cancelled = true;
                break;
            }
            let recipe = Arc::new(self.recipes.recipe(self.index, unit));
            self.pantry.bus().publish(
                Event::new(EventKind::RecipeRequested)
                    .with_worker(Arc::clone(&self.name))
                    .with_attempt(unit + 1)
                    .with_recipe(Arc::clone(&recipe)),
            );

            let acquired = match self.params.acquisition {
                AcquisitionStrategy::Sequential => self.acquire_sequential(&recipe).await,
                AcquisitionStrategy::AllOrNothing => self.acquire_all(&recipe).await,
            };
            if let Flow::Cancelled = acquired {
                cancelled = true;
                break;
            }

            completed += 1;
            self.pantry.bus().publish(
                Event::new(EventKind::RecipeCompleted)
                    .with_worker(Arc::clone(&self.name))
                    .with_attempt(unit + 1),
            );

            if let Flow::Cancelled = self.consume().await {
                cancelled = true;
                break;
            }
        }

        let exit = if cancelled {
            ConsumerExit::Cancelled { units: completed }
        } else {
            ConsumerExit::Exhausted { units: completed }
        };
        self.pantry.bus().publish(
            Event::new(EventKind::ConsumerDone)
                .with_worker(Arc::clone(&self.name))
                .with_units(completed)
                .with_reason(exit.as_label()),
        );
        exit
    }

    /// One ingredient at a time, in catalog order.
    async fn acquire_sequential(&self, recipe: &Recipe) -> Flow {
        for (id, amount) in recipe.requirements() {
            let mut retry = 0u32;
            loop {
                // Registered before the look so a credit right after it is not missed.
                let restocked = self.pantry.restocked();
                match self.pantry.take(&self.name, id, amount).await {
                    Debit::Taken { remaining } => {
                        self.taken(id, amount, remaining);
                        break;
                    }
                    Debit::Short { available } => {
                        if let Flow::Cancelled = self.retry(id, available, retry, restocked).await {
                            return Flow::Cancelled;
                        }
                        retry = retry.saturating_add(1);
                    }
                }
            }
        }
        Flow::Continue
    }

    /// The whole recipe in one critical section, or nothing.
    async fn acquire_all(&self, recipe: &Recipe) -> Flow {
        let wants = recipe.wants();
        if wants.is_empty() {
            return Flow::Continue;
        }
        let mut retry = 0u32;
        loop {
            let restocked = self.pantry.restocked();
            match self.pantry.take_all(&self.name, &wants).await {
                Ok(taken) => {
                    for (&(id, remaining), &(_, amount)) in taken.iter().zip(&wants) {
                        self.taken(id, amount, remaining);
                    }
                    return Flow::Continue;
                }
                Err(short) => {
                    let (id, available) = short.first().copied().unwrap_or((wants[0].0, 0));
                    if let Flow::Cancelled = self.retry(id, available, retry, restocked).await {
                        return Flow::Cancelled;
                    }
                    retry = retry.saturating_add(1);
                }
            }
        }
    }

    fn taken(&self, id: IngredientId, amount: u32, remaining: u32) {
        self.pantry.bus().publish(
            Event::new(EventKind::IngredientTaken)
                .with_worker(Arc::clone(&self.name))
                .with_ingredient(self.pantry.catalog().name_arc(id))
                .with_amount(amount)
                .with_remaining(remaining),
        );
    }

    /// Publishes `AcquireRetry` and waits out the backoff delay.
    async fn retry(
        &self,
        id: IngredientId,
        available: u32,
        retry: u32,
        restocked: tokio::sync::futures::Notified<'_>,
    ) -> Flow {
        let delay = self.params.backoff.next(retry);
        self.pantry.bus().publish(
            Event::new(EventKind::AcquireRetry)
                .with_worker(Arc::clone(&self.name))
                .with_ingredient(self.pantry.catalog().name_arc(id))
                .with_remaining(available)
                .with_attempt(retry.saturating_add(1))
                .with_delay(delay),
        );

        let token = self.pantry.token();
        let sleep = time::sleep(delay);
        tokio::pin!(sleep);
        tokio::pin!(restocked);

        if self.params.wake_on_credit {
            select! {
                _ = &mut sleep => {}
                _ = &mut restocked => {}
                _ = token.cancelled() => return Flow::Cancelled,
            }
        } else {
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => return Flow::Cancelled,
            }
        }

        if token.is_cancelled() {
            Flow::Cancelled
        } else {
            Flow::Continue
        }
    }

    /// Random pause in `[0, consume_max]` after a completed recipe.
    async fn consume(&self) -> Flow {
        let Some(max) = self.params.consume_max else {
            return Flow::Continue;
        };
        let max_us = max.as_micros().min(u128::from(u64::MAX)) as u64;
        let pause = Duration::from_micros(rand::rng().random_range(0..=max_us));

        select! {
            _ = time::sleep(pause) => Flow::Continue,
            _ = self.pantry.token().cancelled() => Flow::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::events::Bus;
    use crate::recipes::ScriptedRecipes;

    const SPICE: IngredientId = IngredientId::new(0);

    fn params() -> ConsumerParams {
        ConsumerParams {
            backoff: BackoffPolicy::constant(Duration::from_millis(1)),
            acquisition: AcquisitionStrategy::Sequential,
            consume_max: None,
            wake_on_credit: false,
        }
    }

    fn script(amounts: &[u32]) -> RecipeRef {
        Arc::new(ScriptedRecipes::new(vec![
            amounts.iter().map(|&a| Recipe::new(vec![a])).collect(),
        ]))
    }

    #[tokio::test]
    async fn completes_from_initial_stock() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 5), Bus::new(64)));
        let consumer = Consumer::new(Arc::clone(&pantry), script(&[2, 3]), 0, params());

        assert_eq!(consumer.run().await, ConsumerExit::Exhausted { units: 2 });
        assert_eq!(pantry.stockpile().quantity(SPICE).await, 0);
        assert_eq!(pantry.signals().pending(SPICE), 1);
    }

    #[tokio::test]
    async fn starved_consumer_stops_on_cancel() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 0), Bus::new(64)));
        let consumer = Consumer::new(Arc::clone(&pantry), script(&[1]), 0, params());
        let handle = tokio::spawn(consumer.run());

        time::sleep(Duration::from_millis(10)).await;
        pantry.shutdown();

        let exit = time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("consumer did not stop")
            .unwrap();
        assert_eq!(exit, ConsumerExit::Cancelled { units: 0 });
    }

    #[tokio::test]
    async fn retries_until_credited() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 0), Bus::new(256)));
        let mut rx = pantry.bus().subscribe();
        let consumer = Consumer::new(Arc::clone(&pantry), script(&[2]), 0, params());
        let handle = tokio::spawn(consumer.run());

        time::sleep(Duration::from_millis(5)).await;
        pantry.stockpile().credit(SPICE, 3).await;

        assert_eq!(handle.await.unwrap(), ConsumerExit::Exhausted { units: 1 });
        assert_eq!(pantry.stockpile().quantity(SPICE).await, 1);

        let mut saw_retry = false;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::AcquireRetry {
                saw_retry = true;
                assert_eq!(ev.remaining, Some(0));
            }
        }
        assert!(saw_retry);
    }

    #[tokio::test]
    async fn zero_work_units_finish_immediately() {
        let pantry = Arc::new(Pantry::new(&Config::single("Spice", 3, 0), Bus::new(64)));
        let none: RecipeRef = Arc::new(ScriptedRecipes::new(vec![vec![]]));
        let consumer = Consumer::new(pantry, none, 0, params());
        assert_eq!(consumer.run().await, ConsumerExit::Exhausted { units: 0 });
    }

    #[test]
    fn exit_labels() {
        assert_eq!(ConsumerExit::Exhausted { units: 3 }.as_label(), "exhausted");
        assert_eq!(ConsumerExit::Cancelled { units: 1 }.units(), 1);
    }
}
