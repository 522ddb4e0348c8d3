//! Cyclic ("loop") annotation design.
//!
//! `nannotators` annotators sit on a cycle; lineup `l` is the group of
//! `annotators_per_item` consecutive annotators starting at `l`, stored as a
//! **sorted** index set. The standard design is 8 annotators, 3 per item:
//!
//! ```text
//! lineup 0: [0, 1, 2]   lineup 5: [5, 6, 7]
//! lineup 6: [0, 6, 7]   lineup 7: [0, 1, 7]
//! ```
//!
//! Items are split into `nlineups` contiguous blocks and block `l` is
//! annotated by lineup `l`. The same table drives pattern counting, the
//! likelihood decomposition and the simulator mask.
use crate::model_bt::errors::{ModelError, ModelResult};

/// Annotators in the standard loop design.
pub const STANDARD_NANNOTATORS: usize = 8;
/// Annotators per item in the standard loop design.
pub const STANDARD_ANNOTATORS_PER_ITEM: usize = 3;

/// Cyclic annotation design.
///
/// Invariant: `1 <= annotators_per_item < nannotators`; `lineups` has one
/// sorted entry per annotator and all entries are distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDesign {
    nannotators: usize,
    annotators_per_item: usize,
    lineups: Vec<Vec<usize>>,
}

impl LoopDesign {
    /// Build the cyclic design with `nannotators` annotators and
    /// `annotators_per_item` consecutive annotators per lineup.
    ///
    /// # Errors
    /// [`ModelError::InvalidDesign`] unless `1 <= annotators_per_item < nannotators`.
    pub fn new(nannotators: usize, annotators_per_item: usize) -> ModelResult<Self> {
        if annotators_per_item == 0 {
            return Err(ModelError::InvalidDesign {
                nannotators,
                annotators_per_item,
                reason: "Each item needs at least one annotator.",
            });
        }
        if annotators_per_item >= nannotators {
            return Err(ModelError::InvalidDesign {
                nannotators,
                annotators_per_item,
                reason: "Annotators per item must be less than the number of annotators.",
            });
        }
        let lineups = cyclic_lineups(nannotators, annotators_per_item);
        Ok(Self { nannotators, annotators_per_item, lineups })
    }

    /// The 8-annotator, 3-per-item loop.
    pub fn standard() -> Self {
        Self {
            nannotators: STANDARD_NANNOTATORS,
            annotators_per_item: STANDARD_ANNOTATORS_PER_ITEM,
            lineups: cyclic_lineups(STANDARD_NANNOTATORS, STANDARD_ANNOTATORS_PER_ITEM),
        }
    }

    pub fn nannotators(&self) -> usize {
        self.nannotators
    }

    pub fn annotators_per_item(&self) -> usize {
        self.annotators_per_item
    }

    pub fn nlineups(&self) -> usize {
        self.lineups.len()
    }

    /// Sorted annotator indices of lineup `l`.
    ///
    /// # Panics
    /// If `l >= nlineups()`.
    pub fn lineup(&self, l: usize) -> &[usize] {
        &self.lineups[l]
    }

    pub fn lineups(&self) -> impl Iterator<Item = &[usize]> {
        self.lineups.iter().map(Vec::as_slice)
    }

    /// Index of the lineup whose annotator set equals `annotators` (sorted).
    pub fn lineup_of(&self, annotators: &[usize]) -> Option<usize> {
        self.lineups.iter().position(|members| members.as_slice() == annotators)
    }

    /// Number of patterns per lineup, `nclasses ^ annotators_per_item`.
    pub fn npatterns(&self, nclasses: usize) -> usize {
        nclasses.pow(self.annotators_per_item as u32)
    }

    /// Size of each contiguous item block.
    ///
    /// # Errors
    /// [`ModelError::NItemsNotDivisible`] unless `nitems` is a multiple of
    /// `nlineups()`.
    pub fn block_size(&self, nitems: usize) -> ModelResult<usize> {
        let nblocks = self.nlineups();
        if nitems % nblocks != 0 {
            return Err(ModelError::NItemsNotDivisible { nitems, nblocks });
        }
        Ok(nitems / nblocks)
    }
}

impl Default for LoopDesign {
    fn default() -> Self {
        Self::standard()
    }
}

// ---- Helper Methods ----

fn cyclic_lineups(n: usize, k: usize) -> Vec<Vec<usize>> {
    (0..n)
        .map(|l| {
            let mut members: Vec<usize> = (0..k).map(|offset| (l + offset) % n).collect();
            members.sort_unstable();
            members
        })
        .collect()
}
