//! Synthetic labels and annotations drawn from Model B-with-theta.
//!
//! Purpose
//! -------
//! Produce ground truth for simulation studies and tests: true labels from
//! the class prior, then noisy annotations from the per-annotator emission
//! model, masked to the loop design.
//!
//! Key behaviors
//! -------------
//! - [`Simulator::generate_labels`]: i.i.d. categorical draws from `gamma`.
//! - [`Simulator::generate_annotations`]: every annotator labels every item
//!   (the truth with probability `theta_j`, otherwise a uniformly chosen
//!   wrong class), then [`apply_loop_mask`] blanks the annotators outside
//!   each item's lineup.
//!
//! Invariants & assumptions
//! ------------------------
//! - `nitems` must be a multiple of the number of lineups; block `l` of
//!   `nitems / nlineups` consecutive items is annotated by lineup `l`, the
//!   same assignment the counting step and the likelihood decomposition use.
//! - Every masked row has exactly `annotators_per_item` labels.
//!
//! Conventions
//! -----------
//! - All randomness comes from the caller's `Rng`; seeding is the caller's
//!   responsibility.
use crate::model_bt::{
    core::{
        counts::MISSING_VALUE,
        design::LoopDesign,
        validation::{validate_gamma, validate_nclasses, validate_theta},
    },
    errors::{ModelError, ModelResult},
};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

/// Sampler for a fixed class count and design.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulator {
    nclasses: usize,
    design: LoopDesign,
}

impl Simulator {
    /// # Errors
    /// [`ModelError::InvalidNClasses`] if `nclasses == 0`.
    pub fn new(nclasses: usize, design: LoopDesign) -> ModelResult<Self> {
        validate_nclasses(nclasses)?;
        Ok(Self { nclasses, design })
    }

    pub fn design(&self) -> &LoopDesign {
        &self.design
    }

    /// Draw `nitems` true labels from `gamma`.
    ///
    /// # Errors
    /// - Validation errors for `gamma`.
    /// - [`ModelError::InvalidDistribution`] if `gamma` cannot be sampled.
    pub fn generate_labels<R: Rng + ?Sized>(
        &self, gamma: ArrayView1<f64>, nitems: usize, rng: &mut R,
    ) -> ModelResult<Array1<usize>> {
        validate_gamma(gamma, self.nclasses)?;
        let categorical = WeightedIndex::new(gamma.iter())
            .map_err(|e| ModelError::InvalidDistribution(e.to_string()))?;
        Ok(Array1::from_shape_fn(nitems, |_| categorical.sample(rng)))
    }

    /// Draw annotations for `labels` and mask them to the loop design.
    ///
    /// Returns an `nitems × nannotators` matrix with [`MISSING_VALUE`]
    /// outside each item's lineup.
    ///
    /// # Errors
    /// - Validation errors for `theta` (length must be `nannotators`).
    /// - [`ModelError::TrueLabelOutOfRange`] for a true label `>= nclasses`.
    /// - [`ModelError::NItemsNotDivisible`] if the items do not split into
    ///   equal lineup blocks.
    pub fn generate_annotations<R: Rng + ?Sized>(
        &self, theta: ArrayView1<f64>, labels: ArrayView1<usize>, rng: &mut R,
    ) -> ModelResult<Array2<i64>> {
        let nannotators = self.design.nannotators();
        validate_theta(theta, nannotators)?;
        if let Some((index, &label)) =
            labels.iter().enumerate().find(|(_, l)| **l >= self.nclasses)
        {
            return Err(ModelError::TrueLabelOutOfRange { index, label, nclasses: self.nclasses });
        }
        self.design.block_size(labels.len())?;

        // emissions[j][psi] samples annotator j's report when the truth is psi.
        let emissions = theta
            .iter()
            .map(|&t| {
                (0..self.nclasses)
                    .map(|psi| {
                        WeightedIndex::new(emission_weights(t, psi, self.nclasses))
                            .map_err(|e| ModelError::InvalidDistribution(e.to_string()))
                    })
                    .collect::<ModelResult<Vec<_>>>()
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let mut annotations = Array2::<i64>::zeros((labels.len(), nannotators));
        for ((item, j), value) in annotations.indexed_iter_mut() {
            *value = emissions[j][labels[item]].sample(rng) as i64;
        }
        apply_loop_mask(&mut annotations, &self.design)?;
        Ok(annotations)
    }
}

/// Overwrite every entry outside its item's lineup with [`MISSING_VALUE`].
///
/// Item `i` belongs to block `i / (nitems / nlineups)` and keeps only the
/// columns of that lineup.
///
/// # Errors
/// [`ModelError::NItemsNotDivisible`] for uneven blocks;
/// [`ModelError::AnnotationShapeMismatch`] on a wrong column count.
pub fn apply_loop_mask(annotations: &mut Array2<i64>, design: &LoopDesign) -> ModelResult<()> {
    if annotations.ncols() != design.nannotators() {
        return Err(ModelError::AnnotationShapeMismatch {
            expected: design.nannotators(),
            found: annotations.ncols(),
        });
    }
    let block = design.block_size(annotations.nrows())?;
    if block == 0 {
        return Ok(());
    }
    for (item, mut row) in annotations.rows_mut().into_iter().enumerate() {
        let members = design.lineup(item / block);
        for (j, value) in row.iter_mut().enumerate() {
            if !members.contains(&j) {
                *value = MISSING_VALUE;
            }
        }
    }
    Ok(())
}

// ---- Helper Methods ----

/// Report distribution of an annotator with accuracy `t` when the truth is
/// `psi`.
fn emission_weights(t: f64, psi: usize, nclasses: usize) -> Vec<f64> {
    if nclasses == 1 {
        return vec![1.0];
    }
    let wrong = (1.0 - t) / (nclasses - 1) as f64;
    (0..nclasses).map(|v| if v == psi { t } else { wrong }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    // Purpose
    // -------
    // Labels follow gamma.
    //
    // Given
    // -----
    // - K = 3, gamma = [0.2, 0.5, 0.3], 20 000 items, seeded RNG.
    //
    // Expect
    // ------
    // - All labels < 3; empirical frequencies within 0.02 of gamma.
    fn labels_follow_class_prior() {
        // Arrange
        let sim = Simulator::new(3, LoopDesign::standard()).expect("valid simulator");
        let gamma = array![0.2, 0.5, 0.3];
        let mut rng = StdRng::seed_from_u64(11);

        // Act
        let labels = sim.generate_labels(gamma.view(), 20_000, &mut rng).expect("valid draw");

        // Assert
        let mut freq = [0.0; 3];
        for &l in labels.iter() {
            freq[l] += 1.0 / 20_000.0;
        }
        for k in 0..3 {
            assert_abs_diff_eq!(freq[k], gamma[k], epsilon = 0.02);
        }
    }

    #[test]
    // Purpose
    // -------
    // Every row keeps exactly its lineup's annotators.
    //
    // Given
    // -----
    // - K = 4, standard design, 800 items.
    //
    // Expect
    // ------
    // - 3 present and 5 missing entries per row; present columns equal the
    //   lineup of the item's block; present labels lie in [0, 4).
    fn annotations_are_masked_to_lineups() {
        // Arrange
        let design = LoopDesign::standard();
        let sim = Simulator::new(4, design.clone()).expect("valid simulator");
        let mut rng = StdRng::seed_from_u64(3);
        let gamma = array![0.25, 0.25, 0.25, 0.25];
        let theta = Array1::from_elem(8, 0.7);

        // Act
        let labels = sim.generate_labels(gamma.view(), 800, &mut rng).expect("labels");
        let annotations =
            sim.generate_annotations(theta.view(), labels.view(), &mut rng).expect("annotations");

        // Assert
        for (item, row) in annotations.rows().into_iter().enumerate() {
            let present: Vec<usize> =
                (0..8).filter(|&j| row[j] != MISSING_VALUE).collect();
            assert_eq!(present.len(), 3);
            assert_eq!(present.as_slice(), design.lineup(item / 100));
            assert!(present.iter().all(|&j| (0..4).contains(&row[j])));
        }
    }

    #[test]
    // Purpose
    // -------
    // Accuracy extremes behave as expected.
    //
    // Given
    // -----
    // - theta = 1 for every annotator; then theta = 0 with K = 2.
    //
    // Expect
    // ------
    // - theta = 1 copies the label; theta = 0 with two classes always flips.
    fn accuracy_extremes_copy_or_flip() {
        let sim = Simulator::new(2, LoopDesign::standard()).expect("valid simulator");
        let mut rng = StdRng::seed_from_u64(5);
        let labels = Array1::from_shape_fn(16, |i| i % 2);

        let copy = sim
            .generate_annotations(Array1::ones(8).view(), labels.view(), &mut rng)
            .expect("annotations");
        let flip = sim
            .generate_annotations(Array1::zeros(8).view(), labels.view(), &mut rng)
            .expect("annotations");

        for (item, (c_row, f_row)) in copy.rows().into_iter().zip(flip.rows()).enumerate() {
            for j in 0..8 {
                if c_row[j] != MISSING_VALUE {
                    assert_eq!(c_row[j], labels[item] as i64);
                    assert_eq!(f_row[j], 1 - labels[item] as i64);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Structural input problems are reported.
    fn rejects_uneven_items_and_bad_labels() {
        let sim = Simulator::new(2, LoopDesign::standard()).expect("valid simulator");
        let mut rng = StdRng::seed_from_u64(0);
        let theta = Array1::from_elem(8, 0.8);

        assert_eq!(
            sim.generate_annotations(theta.view(), Array1::zeros(10).view(), &mut rng),
            Err(ModelError::NItemsNotDivisible { nitems: 10, nblocks: 8 })
        );
        let mut labels = Array1::<usize>::zeros(8);
        labels[3] = 2;
        assert_eq!(
            sim.generate_annotations(theta.view(), labels.view(), &mut rng),
            Err(ModelError::TrueLabelOutOfRange { index: 3, label: 2, nclasses: 2 })
        );
        assert!(matches!(
            sim.generate_annotations(Array1::from_elem(7, 0.8).view(), array![0].view(), &mut rng),
            Err(ModelError::ThetaLengthMismatch { expected: 8, found: 7 })
        ));
    }
}
