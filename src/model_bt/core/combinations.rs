//! Memoized enumeration of label patterns.
//!
//! For `nclasses = K` and lineup width `k`, the pattern table is the
//! `K^k × k` matrix of every ordered label tuple, in `ndindex` order (last
//! position varies fastest). Row `r` of the table is the tuple whose pattern
//! index is `r = Σ_m v_m · K^(k-1-m)`; pattern counts and pattern
//! frequencies share this indexing.
//!
//! Tables are built once per `(K, k)` and shared as `Arc<Array2<usize>>`.
//! The cache is an explicit object owned by the likelihood engine (and
//! shareable between engines through an `Arc`); population goes through
//! `DashMap::entry`, which holds the shard lock while the table is built,
//! so concurrent callers never build the same entry twice and never observe
//! a partially built table.
use std::sync::Arc;

use dashmap::DashMap;
use ndarray::Array2;

/// Shared pattern table.
pub type PatternTable = Arc<Array2<usize>>;

/// Thread-safe, insert-only cache of pattern tables keyed by
/// `(nclasses, width)`.
#[derive(Debug, Default)]
pub struct CombinationCache {
    tables: DashMap<(usize, usize), PatternTable>,
}

impl CombinationCache {
    pub fn new() -> Self {
        Self { tables: DashMap::new() }
    }

    /// Pattern table for `nclasses` labels and `width` annotators.
    ///
    /// Reads hit the fast path; a miss builds the table under the entry lock.
    pub fn get(&self, nclasses: usize, width: usize) -> PatternTable {
        if let Some(table) = self.tables.get(&(nclasses, width)) {
            return Arc::clone(table.value());
        }
        let entry =
            self.tables.entry((nclasses, width)).or_insert_with(|| Arc::new(enumerate(nclasses, width)));
        Arc::clone(entry.value())
    }

    /// Pattern table of the standard three-annotator lineup.
    pub fn triplets(&self, nclasses: usize) -> PatternTable {
        self.get(nclasses, 3)
    }

    /// Number of distinct tables built so far.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ---- Helper Methods ----

fn enumerate(nclasses: usize, width: usize) -> Array2<usize> {
    let npatterns = nclasses.pow(width as u32);
    Array2::from_shape_fn((npatterns, width), |(row, pos)| {
        let stride = nclasses.pow((width - 1 - pos) as u32);
        (row / stride) % nclasses
    })
}
