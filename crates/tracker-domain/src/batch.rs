//! Per-category quantities submitted together as one ledger operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{Category, Family};

/// Unit counts keyed by category. Missing categories count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    quantities: BTreeMap<Category, u64>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, quantity: u64) -> Self {
        self.set(category, quantity);
        self
    }

    /// Sets the quantity for `category`, replacing any previous value.
    pub fn set(&mut self, category: Category, quantity: u64) {
        self.quantities.insert(category, quantity);
    }

    pub fn get(&self, category: Category) -> u64 {
        self.quantities.get(&category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.quantities.contains_key(&category)
    }

    /// Iterates over explicitly supplied entries, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.quantities
            .iter()
            .map(|(category, quantity)| (*category, *quantity))
    }

    /// Sum of all quantities, or `None` if it does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.quantities
            .values()
            .try_fold(0u64, |acc, quantity| acc.checked_add(*quantity))
    }

    pub fn is_zero(&self) -> bool {
        self.quantities.values().all(|quantity| *quantity == 0)
    }

    /// Weighted contribution of the batch under the point table.
    pub fn points(&self) -> f64 {
        self.iter()
            .map(|(category, quantity)| category.points() * quantity as f64)
            .sum()
    }

    /// Returns the family when every non-zero entry belongs to the same one.
    pub fn single_family(&self) -> Option<Family> {
        let mut families = self
            .iter()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|(category, _)| category.family());
        let first = families.next()?;
        families.all(|family| family == first).then_some(first)
    }
}

impl FromIterator<(Category, u64)> for Batch {
    fn from_iter<I: IntoIterator<Item = (Category, u64)>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for (category, quantity) in iter {
            batch.set(category, quantity);
        }
        batch
    }
}

impl<const N: usize> From<[(Category, u64); N]> for Batch {
    fn from(entries: [(Category, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}
