use std::sync::Arc;

use crate::{
    config::Config,
    error::ConfigError,
    events::Bus,
    recipes::RecipeRef,
    subscribers::Subscribe,
};
use super::{coordinator::Coordinator, pantry::Pantry};

/// Builder for constructing a [`Coordinator`].
pub struct CoordinatorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    recipes: Option<RecipeRef>,
}

impl CoordinatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            recipes: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (recipes, debits, restocks, shutdown)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the random recipe source built from the config.
    ///
    /// With a custom source the config's recipe bounds are not validated.
    pub fn with_recipes(mut self, recipes: RecipeRef) -> Self {
        self.recipes = Some(recipes);
        self
    }

    /// Validates the config and builds the coordinator.
    ///
    /// Creates the event bus and the shared [`Pantry`]; no task is spawned
    /// until [`Coordinator::run`].
    pub fn build(self) -> Result<Coordinator, ConfigError> {
        self.cfg.validate()?;
        let recipes = match self.recipes {
            Some(recipes) => recipes,
            None => {
                self.cfg.validate_recipes()?;
                Arc::new(self.cfg.recipe_source())
            }
        };

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let pantry = Arc::new(Pantry::new(&self.cfg, bus));
        Ok(Coordinator::new_internal(
            self.cfg,
            pantry,
            recipes,
            self.subscribers,
        ))
    }
}
