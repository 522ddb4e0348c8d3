//! Pattern counts per lineup.
//!
//! Purpose
//! -------
//! Hold the sufficient statistics of Model B-with-theta: for every lineup of
//! the design, how often each ordered label pattern was observed. Also
//! provide the counting step that reduces a raw item × annotator matrix to
//! these statistics, and the empirical class frequencies used to seed the
//! class prior.
//!
//! Key behaviors
//! -------------
//! - [`AnnotationCounts::new`] validates externally produced counts.
//! - [`AnnotationCounts::from_annotations`] assigns each row to the lineup
//!   whose annotator set equals the row's non-missing set and increments the
//!   row's pattern.
//! - [`AnnotationCounts::check_shape`] checks the `(K^k, nlineups)` layout
//!   against a class count and design before any likelihood work.
//!
//! Invariants & assumptions
//! ------------------------
//! - Counts are finite, non-negative, integer-valued `f64`s.
//! - Column `l` belongs to lineup `l`; row `r` is the pattern with index
//!   `r = Σ_m v_m · K^(k-1-m)` over the lineup's sorted annotators, matching
//!   the row order of the combination tables.
//!
//! Conventions
//! -----------
//! - Annotation matrices are `i64` with [`MISSING_VALUE`] (`-1`) marking
//!   annotators that did not label an item.
//!
//! Testing notes
//! -------------
//! - Unit tests cover validation, the counting step on a hand-built matrix,
//!   structural errors, and the empirical frequencies.
//! - The integration test cross-checks counting against the simulator mask.
use crate::model_bt::{
    core::{
        design::LoopDesign,
        validation::{validate_count, validate_nclasses},
    },
    errors::{ModelError, ModelResult},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Sentinel for a missing annotation.
pub const MISSING_VALUE: i64 = -1;

/// Validated pattern counts, shape `(npatterns, nlineups)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationCounts {
    counts: Array2<f64>,
}

impl AnnotationCounts {
    /// Wrap externally produced counts.
    ///
    /// # Errors
    /// - [`ModelError::EmptyCounts`] if either dimension is zero.
    /// - [`ModelError::InvalidCount`] for the first non-finite, negative, or
    ///   fractional entry.
    pub fn new(counts: Array2<f64>) -> ModelResult<Self> {
        if counts.is_empty() {
            return Err(ModelError::EmptyCounts);
        }
        for ((pattern, lineup), &value) in counts.indexed_iter() {
            validate_count(value, pattern, lineup)?;
        }
        Ok(Self { counts })
    }

    /// Reduce an `nitems × nannotators` label matrix to pattern counts.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNClasses`] if `nclasses == 0`.
    /// - [`ModelError::AnnotationShapeMismatch`] on a wrong column count.
    /// - [`ModelError::LabelOutOfRange`] for labels outside `[0, nclasses)`
    ///   other than [`MISSING_VALUE`].
    /// - [`ModelError::RowOutsideDesign`] when a row's non-missing annotators
    ///   do not form a lineup.
    pub fn from_annotations(
        annotations: ArrayView2<i64>, nclasses: usize, design: &LoopDesign,
    ) -> ModelResult<Self> {
        validate_nclasses(nclasses)?;
        if annotations.ncols() != design.nannotators() {
            return Err(ModelError::AnnotationShapeMismatch {
                expected: design.nannotators(),
                found: annotations.ncols(),
            });
        }
        let mut counts = Array2::<f64>::zeros((design.npatterns(nclasses), design.nlineups()));
        let mut present = Vec::with_capacity(design.annotators_per_item());
        for (row, labels) in annotations.rows().into_iter().enumerate() {
            present.clear();
            let mut pattern = 0usize;
            for (col, &label) in labels.iter().enumerate() {
                if label == MISSING_VALUE {
                    continue;
                }
                if label < 0 || label as usize >= nclasses {
                    return Err(ModelError::LabelOutOfRange { row, col, label, nclasses });
                }
                present.push(col);
                pattern = pattern * nclasses + label as usize;
            }
            let lineup = design.lineup_of(&present).ok_or(ModelError::RowOutsideDesign { row })?;
            counts[[pattern, lineup]] += 1.0;
        }
        Ok(Self { counts })
    }

    /// Check the layout against `nclasses` and `design`.
    ///
    /// # Errors
    /// [`ModelError::PatternCountMismatch`] / [`ModelError::LineupCountMismatch`].
    pub fn check_shape(&self, nclasses: usize, design: &LoopDesign) -> ModelResult<()> {
        let expected_patterns = design.npatterns(nclasses);
        if self.counts.nrows() != expected_patterns {
            return Err(ModelError::PatternCountMismatch {
                expected: expected_patterns,
                found: self.counts.nrows(),
            });
        }
        if self.counts.ncols() != design.nlineups() {
            return Err(ModelError::LineupCountMismatch {
                expected: design.nlineups(),
                found: self.counts.ncols(),
            });
        }
        Ok(())
    }

    pub fn counts(&self) -> ArrayView2<'_, f64> {
        self.counts.view()
    }

    /// Pattern counts of lineup `l`.
    pub fn lineup(&self, l: usize) -> ArrayView1<'_, f64> {
        self.counts.column(l)
    }

    pub fn nlineups(&self) -> usize {
        self.counts.ncols()
    }

    /// Total number of counted items.
    pub fn nitems(&self) -> f64 {
        self.counts.sum()
    }

    /// Empirical class frequencies over every annotation position.
    ///
    /// Each item of a lineup contributes `k` labels; the result is the label
    /// histogram divided by `k · nitems`. With no items the uniform
    /// distribution is returned.
    ///
    /// Assumes `check_shape(nclasses, design)` holds.
    pub fn class_frequencies(&self, nclasses: usize, design: &LoopDesign) -> Array1<f64> {
        let width = design.annotators_per_item();
        let total = self.nitems() * width as f64;
        if total <= 0.0 {
            return Array1::from_elem(nclasses, 1.0 / nclasses as f64);
        }
        let mut freq = Array1::<f64>::zeros(nclasses);
        for (pattern, row) in self.counts.rows().into_iter().enumerate() {
            let items = row.sum();
            if items == 0.0 {
                continue;
            }
            let mut rest = pattern;
            for _ in 0..width {
                freq[rest % nclasses] += items;
                rest /= nclasses;
            }
        }
        freq / total
    }
}
