//! Error types used by the pantry runtime.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] — a [`Config`](crate::Config) that cannot describe a runnable pantry.
//! - [`RuntimeError`] — failures surfaced by [`Coordinator::run`](crate::Coordinator::run).
//!
//! Stock shortages are **not** errors: a starved consumer retries with a bounded
//! delay until stock arrives or shutdown aborts the wait.

use thiserror::Error;

/// # Errors produced while validating a configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The ingredient catalog is empty.
    #[error("at least one ingredient is required")]
    NoIngredients,

    /// Two ingredients share the same name.
    #[error("duplicate ingredient name {name:?}")]
    DuplicateIngredient {
        /// The repeated name.
        name: String,
    },

    /// A supplier would credit nothing per replenishment.
    #[error("ingredient {ingredient:?} has a zero batch size")]
    ZeroBatch {
        /// Name of the offending ingredient.
        ingredient: String,
    },

    /// The recipe base subset is empty.
    #[error("recipe base subset is empty")]
    EmptyBase,

    /// A base subset entry does not index into the catalog.
    #[error("base ingredient index {index} is out of range")]
    UnknownBaseIngredient {
        /// The out-of-range index.
        index: usize,
    },

    /// Every ingredient is in the base subset, so no non-base entry can be drawn.
    #[error("recipes need at least one ingredient outside the base subset")]
    NoExtraIngredients,

    /// A quantity bound of zero makes the "at least one nonzero" rule unsatisfiable.
    #[error("recipe bound {which} must be at least 1")]
    ZeroRecipeBound {
        /// Which bound (`base_max` or `extra_max`).
        which: &'static str,
    },

    /// The per-consumer recipe-count range is inverted.
    #[error("invalid recipes-per-consumer range {min}..={max}")]
    InvalidRecipeRange {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pantry::ConfigError;
    ///
    /// assert_eq!(ConfigError::EmptyBase.as_label(), "config_empty_base");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NoIngredients => "config_no_ingredients",
            ConfigError::DuplicateIngredient { .. } => "config_duplicate_ingredient",
            ConfigError::ZeroBatch { .. } => "config_zero_batch",
            ConfigError::EmptyBase => "config_empty_base",
            ConfigError::UnknownBaseIngredient { .. } => "config_unknown_base_ingredient",
            ConfigError::NoExtraIngredients => "config_no_extra_ingredients",
            ConfigError::ZeroRecipeBound { .. } => "config_zero_recipe_bound",
            ConfigError::InvalidRecipeRange { .. } => "config_invalid_recipe_range",
        }
    }
}

/// # Errors produced by a pantry run.
///
/// A well-formed run always completes; this only reports a worker task that
/// panicked, after every other worker has been stopped and joined.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A supplier or consumer task panicked.
    #[error("worker {worker:?} panicked: {info}")]
    WorkerPanicked {
        /// Worker name (`supplier:<ingredient>` or `consumer-<n>`).
        worker: String,
        /// Panic payload, when it was a string.
        info: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::WorkerPanicked { .. } => "runtime_worker_panicked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ConfigError::NoIngredients.as_label(), "config_no_ingredients");
        assert_eq!(
            ConfigError::ZeroBatch {
                ingredient: "spice".into()
            }
            .as_label(),
            "config_zero_batch"
        );
        let err = RuntimeError::WorkerPanicked {
            worker: "consumer-1".into(),
            info: "boom".into(),
        };
        assert_eq!(err.as_label(), "runtime_worker_panicked");
    }

    #[test]
    fn display_mentions_offender() {
        let err = ConfigError::InvalidRecipeRange { min: 5, max: 2 };
        assert_eq!(err.to_string(), "invalid recipes-per-consumer range 5..=2");
    }
}
