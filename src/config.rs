//! # Pantry configuration.
//!
//! [`Config`] centralizes every knob of a run: the ingredient catalog and
//! supplier batch sizes, consumer pool size and workload, recipe bounds, the
//! retry policy and the synchronization strategies.
//!
//! ## Sentinel values
//! - `consume_max = 0s` → consumers do not pause between work units
//! - `bus_capacity` is clamped to at least 1
//! - `seed = None` → fresh randomness every run
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use pantry::{BackoffPolicy, Config, ResupplyPolicy};
//!
//! let mut cfg = Config::default();
//! cfg.consumers = 4;
//! cfg.recipes_per_consumer = 2..=3;
//! cfg.backoff = BackoffPolicy::constant(Duration::from_millis(2));
//! cfg.resupply = ResupplyPolicy::OnShortfall;
//!
//! assert!(cfg.validate().is_ok());
//! assert_eq!(cfg.catalog().len(), 6);
//! ```

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;
use crate::policies::{AcquisitionStrategy, BackoffPolicy, ResupplyPolicy};
use crate::recipes::{RandomRecipes, RecipeBounds};
use crate::stock::{Catalog, IngredientSpec};

/// Names of the tea-party ingredients; the first two are the tea leaves.
pub const TEA_PARTY_INGREDIENTS: [&str; 6] = [
    "Green Tea Leaf",
    "Black Tea Leaf",
    "Bergamot Oil",
    "Hibiscus Leaf",
    "Puffed Rice",
    "Spice",
];

/// Configuration of a pantry run.
///
/// ## Field semantics
/// - `ingredients`: catalog, one supplier per entry (batch size, initial stock)
/// - `recipe`: bounds for randomly generated recipes
/// - `consumers`: number of consumer workers
/// - `recipes_per_consumer`: each consumer draws its work-unit count from this range
/// - `backoff`: delay between looks while a consumer is short of an ingredient
/// - `consume_max`: upper bound of the random pause after each work unit (`0s` = none)
/// - `acquisition`: sequential (reference) or all-or-nothing recipe acquisition
/// - `resupply`: which shortages wake a supplier
/// - `wake_on_credit`: a credit also cuts short waiting consumers' retry delay
/// - `bus_capacity`: event bus ring buffer size
/// - `seed`: makes recipe and workload generation reproducible
#[derive(Clone, Debug)]
pub struct Config {
    /// Ingredient catalog and supplier batch sizes.
    pub ingredients: Vec<IngredientSpec>,
    /// Random recipe bounds.
    pub recipe: RecipeBounds,
    /// Number of consumer workers.
    pub consumers: usize,
    /// Work units per consumer (drawn per consumer).
    pub recipes_per_consumer: RangeInclusive<u32>,
    /// Retry delay policy for starved consumers.
    pub backoff: BackoffPolicy,
    /// Upper bound of the post-recipe consumption pause.
    pub consume_max: Duration,
    /// Recipe acquisition strategy.
    pub acquisition: AcquisitionStrategy,
    /// Restock trigger policy.
    pub resupply: ResupplyPolicy,
    /// Whether a credit wakes consumers waiting out a retry delay.
    pub wake_on_credit: bool,
    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
    /// Seed for recipe generation.
    pub seed: Option<u64>,
}

impl Default for Config {
    /// The tea-party shape with deterministic batches:
    ///
    /// - six tea-party ingredients, batch `5` each, empty initial stock
    /// - tea leaves as recipe base (`0..=1` each), extras `0..=4`
    /// - `consumers = 14`, `recipes_per_consumer = 15..=25`
    /// - `backoff = BackoffPolicy::default()` (constant 1ms)
    /// - `consume_max = 5ms`
    /// - sequential acquisition, restock on depletion, no credit wake-up
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            ingredients: TEA_PARTY_INGREDIENTS
                .iter()
                .map(|name| IngredientSpec::new(*name, 5))
                .collect(),
            recipe: RecipeBounds::default(),
            consumers: 14,
            recipes_per_consumer: 15..=25,
            backoff: BackoffPolicy::default(),
            consume_max: Duration::from_millis(5),
            acquisition: AcquisitionStrategy::default(),
            resupply: ResupplyPolicy::default(),
            wake_on_credit: false,
            bus_capacity: 1024,
            seed: None,
        }
    }
}

impl Config {
    /// The reference scenario: [`Config::default`] with each supplier's batch
    /// drawn from `1..=10`.
    pub fn tea_party() -> Self {
        let mut cfg = Self::default();
        let mut rng = rand::rng();
        for spec in &mut cfg.ingredients {
            spec.batch = rng.random_range(1..=10);
        }
        cfg
    }

    /// A single-ingredient pantry, handy for focused scenarios.
    ///
    /// No recipe bounds apply: workloads come from a scripted source.
    pub fn single(name: impl Into<String>, batch: u32, initial: u32) -> Self {
        Self {
            ingredients: vec![IngredientSpec::new(name, batch).with_initial(initial)],
            consumers: 1,
            recipes_per_consumer: 1..=1,
            consume_max: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Catalog built from `ingredients`.
    pub fn catalog(&self) -> Catalog {
        Catalog::from_specs(&self.ingredients)
    }

    /// Random recipe source honouring `recipe`, `recipes_per_consumer` and `seed`.
    pub fn recipe_source(&self) -> RandomRecipes {
        let src = RandomRecipes::new(
            self.ingredients.len(),
            self.recipe.clone(),
            self.recipes_per_consumer.clone(),
        );
        match self.seed {
            Some(seed) => src.with_seed(seed),
            None => src,
        }
    }

    /// Consumption pause bound as an `Option` (`None` → no pause).
    #[inline]
    pub fn consume_bound(&self) -> Option<Duration> {
        if self.consume_max == Duration::ZERO {
            None
        } else {
            Some(self.consume_max)
        }
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks the catalog and workload settings.
    ///
    /// Recipe bounds are checked separately by [`Config::validate_recipes`],
    /// since scripted workloads do not use them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingredients.is_empty() {
            return Err(ConfigError::NoIngredients);
        }
        let mut seen = HashSet::new();
        for spec in &self.ingredients {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateIngredient {
                    name: spec.name.clone(),
                });
            }
            if spec.batch == 0 {
                return Err(ConfigError::ZeroBatch {
                    ingredient: spec.name.clone(),
                });
            }
        }
        let (min, max) = (
            *self.recipes_per_consumer.start(),
            *self.recipes_per_consumer.end(),
        );
        if min > max {
            return Err(ConfigError::InvalidRecipeRange { min, max });
        }
        Ok(())
    }

    /// Checks that `recipe` can always produce a valid random recipe.
    pub fn validate_recipes(&self) -> Result<(), ConfigError> {
        let bounds = &self.recipe;
        if bounds.base.is_empty() {
            return Err(ConfigError::EmptyBase);
        }
        if let Some(bad) = bounds
            .base
            .iter()
            .find(|id| id.index() >= self.ingredients.len())
        {
            return Err(ConfigError::UnknownBaseIngredient { index: bad.index() });
        }
        let base: HashSet<usize> = bounds.base.iter().map(|id| id.index()).collect();
        if base.len() >= self.ingredients.len() {
            return Err(ConfigError::NoExtraIngredients);
        }
        if bounds.base_max == 0 {
            return Err(ConfigError::ZeroRecipeBound { which: "base_max" });
        }
        if bounds.extra_max == 0 {
            return Err(ConfigError::ZeroRecipeBound { which: "extra_max" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::IngredientId;

    #[test]
    fn default_is_valid_tea_party_shape() {
        let cfg = Config::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.validate_recipes(), Ok(()));
        assert_eq!(cfg.ingredients.len(), 6);
        assert_eq!(cfg.consumers, 14);
        assert_eq!(cfg.catalog().name(IngredientId::new(2)), "Bergamot Oil");
    }

    #[test]
    fn tea_party_batches_are_in_range() {
        for _ in 0..20 {
            let cfg = Config::tea_party();
            assert!(cfg.ingredients.iter().all(|s| (1..=10).contains(&s.batch)));
        }
    }

    #[test]
    fn rejects_zero_batch_and_duplicates() {
        let mut cfg = Config::default();
        cfg.ingredients[3].batch = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroBatch {
                ingredient: "Hibiscus Leaf".into()
            })
        );

        let mut cfg = Config::default();
        cfg.ingredients[1].name = "Green Tea Leaf".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateIngredient { .. })
        ));
    }

    #[test]
    fn rejects_inverted_range_and_empty_catalog() {
        let mut cfg = Config::default();
        cfg.recipes_per_consumer = 4..=2;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRecipeRange { min: 4, max: 2 })
        );

        cfg.ingredients.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoIngredients));
    }

    #[test]
    fn recipe_bounds_are_checked() {
        let mut cfg = Config::default();
        cfg.recipe.base.clear();
        assert_eq!(cfg.validate_recipes(), Err(ConfigError::EmptyBase));

        let mut cfg = Config::default();
        cfg.recipe.base.push(IngredientId::new(6));
        assert_eq!(
            cfg.validate_recipes(),
            Err(ConfigError::UnknownBaseIngredient { index: 6 })
        );

        let mut cfg = Config::single("Spice", 5, 0);
        cfg.recipe.base = vec![IngredientId::new(0)];
        assert_eq!(cfg.validate_recipes(), Err(ConfigError::NoExtraIngredients));

        let mut cfg = Config::default();
        cfg.recipe.extra_max = 0;
        assert_eq!(
            cfg.validate_recipes(),
            Err(ConfigError::ZeroRecipeBound { which: "extra_max" })
        );
    }

    #[test]
    fn sentinels() {
        let mut cfg = Config::single("Spice", 5, 0);
        assert_eq!(cfg.consume_bound(), None);
        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.ingredients[0].initial, 0);
    }
}
