//! # Example: tea_party
//!
//! The reference scenario: six tea ingredients, one supplier each with a
//! random batch size, fourteen consumers brewing 15–25 random recipes each.
//!
//! Shows how to:
//! - Start from [`Config::tea_party`] and adjust policies.
//! - Attach the built-in [`LogWriter`] (with the catalog, so recipes print by name).
//! - Read the [`RunReport`](pantry::RunReport) once every worker has stopped.
//!
//! ## Flow
//! ```text
//! Coordinator::run()
//!     ├─► Supplier × 6   ── Replenished ──┐
//!     ├─► Consumer × 14  ── RecipeRequested / IngredientTaken / RecipeCompleted
//!     │                                   ▼
//!     │                       Bus ──► LogWriter (tracing)
//!     ├─► ShutdownRequested (all consumers done)
//!     └─► AllStopped ──► RunReport
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=pantry=info cargo run --example tea_party
//! RUST_LOG=pantry=debug cargo run --example tea_party   # every debit and restock request
//! ```

use std::sync::Arc;

use pantry::{Config, Coordinator, LogWriter, ResupplyPolicy, Subscribe};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pantry=info")),
        )
        .init();

    let mut cfg = Config::tea_party();
    // A batch smaller than a recipe's demand would otherwise wait forever.
    cfg.resupply = ResupplyPolicy::OnShortfall;

    for spec in &cfg.ingredients {
        tracing::info!(ingredient = %spec.name, batch = spec.batch, "supplier ready");
    }

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::with_catalog(cfg.catalog()))];
    let report = Coordinator::builder(cfg)
        .with_subscribers(subs)
        .build()?
        .run()
        .await?;

    for (id, entry) in report.catalog.ids().zip(&report.ledger) {
        tracing::info!(
            ingredient = report.catalog.name(id),
            on_hand = entry.quantity,
            credited = entry.credited,
            debited = entry.debited,
            "final stock"
        );
    }
    tracing::info!(
        recipes = report.recipes_completed,
        replenishments = report.replenishments,
        balanced = report.balanced(),
        "tea party over"
    );
    Ok(())
}
