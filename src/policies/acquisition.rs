//! # How a consumer gathers the ingredients of one recipe.
//!
//! [`AcquisitionStrategy`] selects between the classic one-ingredient-at-a-time
//! walk and an all-or-nothing reservation.
//!
//! ```text
//! Sequential:
//!   for (ingredient, amount) in recipe:
//!       loop { lock ─► try_debit ─► unlock ─► (short? wait, retry) }
//!   Ingredients already taken stay taken while a later one is awaited.
//!
//! AllOrNothing:
//!   loop { lock ─► try_debit_all(recipe) ─► unlock ─► (short? wait, retry) }
//!   Nothing is held while waiting.
//! ```
//!
//! `Sequential` can leave a consumer holding bergamot while it waits for
//! hibiscus, starving others that need bergamot; that is the reference
//! behaviour and the default.

/// Recipe acquisition strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    /// Acquire ingredients one at a time, in catalog order (default).
    #[default]
    Sequential,
    /// Acquire the whole recipe in a single critical section or nothing.
    AllOrNothing,
}

impl AcquisitionStrategy {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AcquisitionStrategy::Sequential => "sequential",
            AcquisitionStrategy::AllOrNothing => "all_or_nothing",
        }
    }
}
