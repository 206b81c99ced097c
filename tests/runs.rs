//! Full runs with random recipes across the tea-party catalog.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pantry::{
    AcquisitionStrategy, Config, Coordinator, EventKind, Journal, RecipeSource, ResupplyPolicy,
    RunReport, Subscribe,
};

fn small_party(seed: u64) -> Config {
    let mut cfg = Config::tea_party();
    cfg.consumers = 6;
    cfg.recipes_per_consumer = 3..=6;
    cfg.consume_max = Duration::from_millis(1);
    cfg.resupply = ResupplyPolicy::OnShortfall;
    cfg.bus_capacity = 1 << 16;
    cfg.seed = Some(seed);
    cfg
}

async fn run(cfg: Config) -> (RunReport, Arc<Journal>) {
    let journal = Arc::new(Journal::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![journal.clone()];
    let run = Coordinator::builder(cfg)
        .with_subscribers(subs)
        .build()
        .expect("valid config")
        .run();
    let report = tokio::time::timeout(Duration::from_secs(30), run)
        .await
        .expect("run did not terminate")
        .expect("no worker panicked");
    (report, journal)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_worker_terminates_and_ledger_balances() {
    let cfg = small_party(7);
    let expected: u64 = {
        let src = cfg.recipe_source();
        (0..cfg.consumers).map(|c| u64::from(src.work_units(c))).sum()
    };
    let (report, journal) = run(cfg).await;

    assert_eq!(report.recipes_completed, expected);
    assert_eq!(report.consumers_cancelled, 0);
    assert!(report.balanced());
    assert_eq!(journal.count(EventKind::ConsumerDone), 6);
    assert_eq!(journal.count(EventKind::SupplierDone), 6);
    assert_eq!(journal.count(EventKind::ShutdownRequested), 1);
    assert_eq!(journal.count(EventKind::AllStopped), 1);

    let total_debited: u64 = report.ledger.iter().map(|e| e.debited).sum();
    let total_taken: u64 = journal
        .of_kind(EventKind::IngredientTaken)
        .iter()
        .map(|e| u64::from(e.amount.unwrap_or(0)))
        .sum();
    assert_eq!(total_debited, total_taken);

    let replenished = journal.count(EventKind::Replenished) as u64;
    assert_eq!(report.replenishments, replenished);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_events_follow_worker_completion() {
    let (_, journal) = run(small_party(11)).await;
    let events = journal.events();

    let position = |kind: EventKind| events.iter().position(|e| e.kind == kind);
    let shutdown = position(EventKind::ShutdownRequested).expect("shutdown requested");
    let stopped = position(EventKind::AllStopped).expect("all stopped");

    for (i, ev) in events.iter().enumerate() {
        match ev.kind {
            EventKind::ConsumerDone => assert!(i < shutdown),
            EventKind::SupplierDone => assert!(i < stopped),
            _ => {}
        }
    }
    assert_eq!(stopped, events.len() - 1);

    let suppliers: HashSet<_> = journal
        .of_kind(EventKind::SupplierDone)
        .into_iter()
        .filter_map(|e| e.ingredient)
        .collect();
    assert_eq!(suppliers.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn all_or_nothing_acquisition_completes() {
    let mut cfg = small_party(23);
    cfg.acquisition = AcquisitionStrategy::AllOrNothing;
    let expected: u64 = {
        let src = cfg.recipe_source();
        (0..cfg.consumers).map(|c| u64::from(src.work_units(c))).sum()
    };
    let (report, journal) = run(cfg).await;

    assert_eq!(report.recipes_completed, expected);
    assert!(report.balanced());
    assert_eq!(journal.count(EventKind::RecipeCompleted) as u64, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn credit_wakeups_keep_ledger_balanced() {
    let mut cfg = small_party(31);
    cfg.wake_on_credit = true;
    cfg.backoff = pantry::BackoffPolicy::constant(Duration::from_millis(20));
    let (report, _) = run(cfg).await;
    assert!(report.balanced());
    assert!(report.quantities.iter().zip(&report.ledger).all(|(q, e)| *q == e.quantity));
}

#[tokio::test]
async fn invalid_recipe_bounds_are_rejected_at_build() {
    let mut cfg = Config::default();
    cfg.recipe.base.clear();
    assert_eq!(
        Coordinator::builder(cfg).build().err(),
        Some(pantry::ConfigError::EmptyBase)
    );
}
