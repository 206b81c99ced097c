//! # Recipe sources: where consumers get their work.
//!
//! [`RecipeSource`] is the seam between the synchronization core and the
//! demand model. It decides how many work units each consumer performs and what
//! each unit requires.
//!
//! - [`RandomRecipes`] draws recipes under [`RecipeBounds`] (the tea-party model).
//! - [`ScriptedRecipes`] replays fixed recipes, for reproducible scenarios.
//!
//! ## Example
//! ```rust
//! use pantry::{Recipe, RecipeSource, ScriptedRecipes};
//!
//! let script = ScriptedRecipes::new(vec![vec![Recipe::new([3])]]);
//! assert_eq!(script.work_units(0), 1);
//! assert_eq!(script.recipe(0, 0), Recipe::new([3]));
//! ```

use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::recipes::recipe::Recipe;
use crate::stock::IngredientId;

/// Supplies per-consumer workloads.
pub trait RecipeSource: Send + Sync + 'static {
    /// Number of work units consumer `consumer` (0-based) performs.
    fn work_units(&self, consumer: usize) -> u32;

    /// Recipe for work unit `unit` (0-based) of consumer `consumer`.
    fn recipe(&self, consumer: usize, unit: u32) -> Recipe;
}

/// Shared handle to a recipe source.
pub type RecipeRef = Arc<dyn RecipeSource>;

/// Constraints for randomly generated recipes.
///
/// - every `base` ingredient gets `0..=base_max`, and at least one is nonzero;
/// - every other ingredient gets `0..=extra_max`, and at least one is nonzero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeBounds {
    /// Ingredients of which at least one must be required (the tea leaves).
    pub base: Vec<IngredientId>,
    /// Upper bound per base ingredient.
    pub base_max: u32,
    /// Upper bound per non-base ingredient.
    pub extra_max: u32,
}

impl Default for RecipeBounds {
    /// The first two catalog entries are the base; `base_max = 1`, `extra_max = 4`.
    fn default() -> Self {
        Self {
            base: vec![IngredientId::new(0), IngredientId::new(1)],
            base_max: 1,
            extra_max: 4,
        }
    }
}

/// Random recipe generator.
///
/// With a `seed`, every `(consumer, unit)` pair maps to its own deterministic
/// stream, so a run's demand is reproducible regardless of scheduling.
#[derive(Clone, Debug)]
pub struct RandomRecipes {
    ingredients: usize,
    bounds: RecipeBounds,
    units: RangeInclusive<u32>,
    seed: Option<u64>,
}

impl RandomRecipes {
    /// Creates a generator for a catalog of `ingredients` entries.
    pub fn new(ingredients: usize, bounds: RecipeBounds, units: RangeInclusive<u32>) -> Self {
        Self {
            ingredients,
            bounds,
            units,
            seed: None,
        }
    }

    /// Makes the generator deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng_for(&self, consumer: usize, salt: u64) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mix = seed
                    ^ (consumer as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    ^ salt.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
                StdRng::seed_from_u64(mix)
            }
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    fn is_base(&self, index: usize) -> bool {
        self.bounds.base.iter().any(|b| b.index() == index)
    }

    fn draw(&self, rng: &mut impl Rng) -> Recipe {
        let mut amounts = vec![0u32; self.ingredients];
        let base: Vec<usize> = self
            .bounds
            .base
            .iter()
            .map(|b| b.index())
            .filter(|i| *i < self.ingredients)
            .collect();
        let extras: Vec<usize> = (0..self.ingredients).filter(|i| !self.is_base(*i)).collect();

        for &i in &base {
            amounts[i] = rng.random_range(0..=self.bounds.base_max);
        }
        if !base.is_empty() && base.iter().all(|&i| amounts[i] == 0) {
            let pick = base[rng.random_range(0..base.len())];
            amounts[pick] = rng.random_range(1..=self.bounds.base_max.max(1));
        }

        if !extras.is_empty() && self.bounds.extra_max > 0 {
            loop {
                for &i in &extras {
                    amounts[i] = rng.random_range(0..=self.bounds.extra_max);
                }
                if extras.iter().any(|&i| amounts[i] > 0) {
                    break;
                }
            }
        }
        Recipe::new(amounts)
    }
}

impl RecipeSource for RandomRecipes {
    fn work_units(&self, consumer: usize) -> u32 {
        let (lo, hi) = (*self.units.start(), *self.units.end());
        if lo >= hi {
            return lo;
        }
        self.rng_for(consumer, u64::MAX).random_range(lo..=hi)
    }

    fn recipe(&self, consumer: usize, unit: u32) -> Recipe {
        let mut rng = self.rng_for(consumer, u64::from(unit));
        self.draw(&mut rng)
    }
}

/// Fixed per-consumer recipe lists.
///
/// Consumer `i` performs `script[i].len()` work units; consumers beyond the
/// script perform none.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRecipes {
    script: Vec<Vec<Recipe>>,
}

impl ScriptedRecipes {
    /// Creates a script; the outer index is the consumer.
    pub fn new(script: Vec<Vec<Recipe>>) -> Self {
        Self { script }
    }

    /// Number of scripted consumers.
    pub fn consumers(&self) -> usize {
        self.script.len()
    }
}

impl RecipeSource for ScriptedRecipes {
    fn work_units(&self, consumer: usize) -> u32 {
        self.script
            .get(consumer)
            .map_or(0, |r| u32::try_from(r.len()).unwrap_or(u32::MAX))
    }

    fn recipe(&self, consumer: usize, unit: u32) -> Recipe {
        self.script
            .get(consumer)
            .and_then(|r| r.get(unit as usize))
            .cloned()
            .unwrap_or_default()
    }
}
