//! Recipes and the sources that produce them.
//!
//! - [`Recipe`] per-work-unit requirement vector
//! - [`RecipeSource`] / [`RecipeRef`] workload seam used by consumers
//! - [`RandomRecipes`] + [`RecipeBounds`] constrained random demand
//! - [`ScriptedRecipes`] fixed demand for reproducible runs

mod recipe;
mod source;

pub use recipe::Recipe;
pub use source::{RandomRecipes, RecipeBounds, RecipeRef, RecipeSource, ScriptedRecipes};
