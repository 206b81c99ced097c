//! # Recipe: one consumer's requirement vector for a single work unit.

use std::fmt::Write as _;

use crate::stock::{Catalog, IngredientId};

/// Required quantity per ingredient, indexed by [`IngredientId`].
///
/// A recipe is built fresh for every work unit and owned by the consumer that
/// requested it; it is never shared between workers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipe {
    amounts: Vec<u32>,
}

impl Recipe {
    /// Creates a recipe from per-ingredient amounts in catalog order.
    pub fn new(amounts: impl Into<Vec<u32>>) -> Self {
        Self {
            amounts: amounts.into(),
        }
    }

    /// Creates a recipe needing only `amount` of `id` (catalog of `len` ingredients).
    pub fn single(len: usize, id: IngredientId, amount: u32) -> Self {
        let mut amounts = vec![0; len.max(id.index() + 1)];
        amounts[id.index()] = amount;
        Self { amounts }
    }

    /// Required amount of `id` (`0` if absent).
    #[inline]
    pub fn amount(&self, id: IngredientId) -> u32 {
        self.amounts.get(id.index()).copied().unwrap_or(0)
    }

    /// Raw amounts in catalog order.
    #[inline]
    pub fn amounts(&self) -> &[u32] {
        &self.amounts
    }

    /// Nonzero requirements in catalog order.
    pub fn requirements(&self) -> impl Iterator<Item = (IngredientId, u32)> + '_ {
        self.amounts
            .iter()
            .enumerate()
            .filter(|(_, a)| **a > 0)
            .map(|(i, a)| (IngredientId::new(i), *a))
    }

    /// Nonzero requirements collected for an all-or-nothing debit.
    pub fn wants(&self) -> Vec<(IngredientId, u32)> {
        self.requirements().collect()
    }

    /// True if nothing is required.
    pub fn is_empty(&self) -> bool {
        self.amounts.iter().all(|a| *a == 0)
    }

    /// Human-readable listing, e.g. `1 Green Tea Leaf, 0 Black Tea Leaf, 3 Spice`.
    pub fn describe(&self, catalog: &Catalog) -> String {
        let mut out = String::new();
        for (i, amount) in self.amounts.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{amount} {}", catalog.name(IngredientId::new(i)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::IngredientSpec;

    #[test]
    fn requirements_skip_zero_entries() {
        let r = Recipe::new([1, 0, 3]);
        let reqs: Vec<_> = r.requirements().collect();
        assert_eq!(reqs, vec![(IngredientId::new(0), 1), (IngredientId::new(2), 3)]);
        assert!(!r.is_empty());
        assert_eq!(r.amount(IngredientId::new(9)), 0);
    }

    #[test]
    fn single_pads_to_catalog() {
        let r = Recipe::single(3, IngredientId::new(1), 4);
        assert_eq!(r.amounts(), &[0, 4, 0]);
    }

    #[test]
    fn describe_lists_every_ingredient() {
        let cat = Catalog::from_specs(&[IngredientSpec::new("Hibiscus Leaf", 2), IngredientSpec::new("Spice", 2)]);
        assert_eq!(Recipe::new([0, 2]).describe(&cat), "0 Hibiscus Leaf, 2 Spice");
    }
}
