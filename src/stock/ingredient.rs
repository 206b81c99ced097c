//! # Ingredient identities and the catalog that names them.
//!
//! The ingredient set is fixed when the pantry is built. An [`IngredientId`] is
//! a dense index into that set; [`Catalog`] maps ids back to display names used
//! in events and logs.

use std::fmt;
use std::sync::Arc;

/// Dense index of an ingredient within the pantry's catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientId(usize);

impl IngredientId {
    /// Creates an id from a catalog index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the catalog index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Static description of one ingredient and its supplier.
///
/// - `name`: display name, unique within the catalog
/// - `batch`: quantity the supplier credits per replenishment (`>= 1`)
/// - `initial`: stock present before any worker starts (default `0`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngredientSpec {
    /// Display name.
    pub name: String,
    /// Supplier batch size.
    pub batch: u32,
    /// Stock at startup.
    pub initial: u32,
}

impl IngredientSpec {
    /// Creates a spec with an empty initial stock.
    pub fn new(name: impl Into<String>, batch: u32) -> Self {
        Self {
            name: name.into(),
            batch,
            initial: 0,
        }
    }

    /// Sets the stock present at startup.
    #[must_use]
    pub fn with_initial(mut self, initial: u32) -> Self {
        self.initial = initial;
        self
    }
}

/// Immutable, shareable ingredient name table.
#[derive(Clone, Debug)]
pub struct Catalog {
    names: Arc<[Arc<str>]>,
}

impl Catalog {
    /// Builds a catalog from ingredient specs, preserving order.
    pub fn from_specs(specs: &[IngredientSpec]) -> Self {
        let names: Vec<Arc<str>> = specs.iter().map(|s| Arc::from(s.name.as_str())).collect();
        Self {
            names: names.into(),
        }
    }

    /// Number of ingredients.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the catalog has no ingredients.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates every id in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = IngredientId> + '_ {
        (0..self.names.len()).map(IngredientId::new)
    }

    /// Display name of `id`, or `"unknown"` for an id from another catalog.
    pub fn name(&self, id: IngredientId) -> &str {
        self.names.get(id.index()).map(|n| &**n).unwrap_or("unknown")
    }

    /// Shared handle to the name of `id` (cheap clone for events).
    pub fn name_arc(&self, id: IngredientId) -> Arc<str> {
        self.names
            .get(id.index())
            .cloned()
            .unwrap_or_else(|| Arc::from("unknown"))
    }

    /// Looks up an id by display name.
    pub fn id(&self, name: &str) -> Option<IngredientId> {
        self.names
            .iter()
            .position(|n| &**n == name)
            .map(IngredientId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_round_trips_names() {
        let cat = Catalog::from_specs(&[
            IngredientSpec::new("Green Tea Leaf", 3),
            IngredientSpec::new("Spice", 7).with_initial(2),
        ]);
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.id("Spice"), Some(IngredientId::new(1)));
        assert_eq!(cat.name(IngredientId::new(0)), "Green Tea Leaf");
        assert_eq!(cat.name(IngredientId::new(9)), "unknown");
        assert_eq!(cat.ids().count(), 2);
    }
}
