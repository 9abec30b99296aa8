//! Reusable weighted-choice utility over an explicit probability table.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Items paired with relative weights. Weights need not sum to anything.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T> WeightedTable<T> {
    /// Build a table. Returns `None` when there are no entries or every weight is zero.
    pub fn new(entries: impl IntoIterator<Item = (T, u32)>) -> Option<Self> {
        let (items, weights): (Vec<T>, Vec<u32>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(weights).ok()?;
        Some(Self { items, index })
    }

    /// Draw one item. Zero-weight items are never returned.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.items[self.index.sample(rng)]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Uniform pick from a non-empty slice of copyable items.
pub fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}
