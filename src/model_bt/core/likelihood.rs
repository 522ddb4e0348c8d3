//! Exact log-likelihood of Model B-with-theta.
//!
//! Purpose
//! -------
//! Score pattern counts against a class prior `gamma` and annotator
//! accuracies `theta`. Each item's true class `psi ~ gamma`; annotator `j`
//! reports `psi` with probability `theta_j` and otherwise one of the other
//! `K - 1` classes uniformly. For a lineup with accuracies
//! `(theta_1, …, theta_k)`:
//!
//! ```text
//! P(v) = Σ_psi gamma[psi] · Π_m e(v_m | psi, theta_m)
//! e(v | psi, t) = t                if v == psi
//!               = (1 - t)/(K - 1)  otherwise
//! ```
//!
//! and the lineup log-likelihood is `Σ_v counts[v] · ln P(v)`. The model
//! log-likelihood sums the lineups of the design.
//!
//! Key behaviors
//! -------------
//! - Pattern enumeration comes from a shared [`CombinationCache`], so the
//!   `K^k` table is built once per class count.
//! - With priors enabled, each lineup adds `Σ_m ln Beta(theta_m; 2, 1)`
//!   for its annotators (an annotator is counted once per lineup it sits
//!   in).
//!
//! Invariants & assumptions
//! ------------------------
//! - Out-of-domain parameters (`gamma` or `theta` outside `[0, 1]`, or NaN)
//!   are not errors: the log-likelihood is [`LOG_LIKELIHOOD_FLOOR`]. The
//!   same value replaces any non-finite result, e.g. a pattern with zero
//!   model probability but a positive count.
//! - Zero counts contribute nothing (`0 · ln 0 = 0`).
//! - The floor is a search device only and is never exponentiated.
//! - For `K = 1` every emission is 1 and all mass sits on the single
//!   pattern.
//!
//! Conventions
//! -----------
//! - `counts` for a lineup are indexed like the rows of its pattern table.
//! - `theta_lineup[m]` is the accuracy of the `m`-th (sorted) annotator of
//!   the lineup.
//!
//! Testing notes
//! -------------
//! - Unit tests cover normalization of pattern frequencies, hand-computed
//!   values, the floor on out-of-domain input, priors, lineup-order
//!   invariance, the `K = 1` edge case and shape validation of the model
//!   log-likelihood.
use std::sync::Arc;

use crate::{
    model_bt::{
        core::{
            combinations::CombinationCache, counts::AnnotationCounts, design::LoopDesign,
            priors::log_accuracy_prior, validation::validate_nclasses,
        },
        errors::{ModelError, ModelResult},
    },
    optimization::numerical_stability::transformations::xlogy,
};
use ndarray::{Array1, ArrayView1, Axis};

/// Log-likelihood returned for out-of-domain or non-finite evaluations.
pub const LOG_LIKELIHOOD_FLOOR: f64 = -1e20;

/// Log-likelihood evaluator bound to a design and a combination cache.
#[derive(Debug, Clone)]
pub struct LikelihoodEngine {
    design: LoopDesign,
    cache: Arc<CombinationCache>,
    use_priors: bool,
}

impl LikelihoodEngine {
    pub fn new(design: LoopDesign, cache: Arc<CombinationCache>, use_priors: bool) -> Self {
        Self { design, cache, use_priors }
    }

    pub fn design(&self) -> &LoopDesign {
        &self.design
    }

    pub fn cache(&self) -> &Arc<CombinationCache> {
        &self.cache
    }

    pub fn use_priors(&self) -> bool {
        self.use_priors
    }

    /// Model probability of every pattern of a lineup.
    ///
    /// Returns a vector of length `K^k` (with `K = gamma.len()` and
    /// `k = theta_lineup.len()`) that sums to 1 for in-domain parameters.
    /// Inputs are not validated.
    pub fn pattern_frequencies(
        &self, theta_lineup: ArrayView1<f64>, gamma: ArrayView1<f64>,
    ) -> Array1<f64> {
        let nclasses = gamma.len();
        let table = self.cache.get(nclasses, theta_lineup.len());
        let wrong: Vec<f64> = if nclasses > 1 {
            theta_lineup.iter().map(|t| (1.0 - t) / (nclasses - 1) as f64).collect()
        } else {
            vec![1.0; theta_lineup.len()]
        };
        let right: Vec<f64> = if nclasses > 1 {
            theta_lineup.to_vec()
        } else {
            vec![1.0; theta_lineup.len()]
        };

        table
            .rows()
            .into_iter()
            .map(|pattern| {
                gamma
                    .iter()
                    .enumerate()
                    .map(|(psi, &prior)| {
                        pattern.iter().enumerate().fold(prior, |acc, (m, &v)| {
                            acc * if v == psi { right[m] } else { wrong[m] }
                        })
                    })
                    .sum::<f64>()
            })
            .collect()
    }

    /// Log-likelihood of one lineup's counts.
    ///
    /// Returns [`LOG_LIKELIHOOD_FLOOR`] when `gamma` or `theta_lineup` is out
    /// of domain or the result is not finite.
    pub fn log_likelihood_triplet(
        &self, counts: ArrayView1<f64>, theta_lineup: ArrayView1<f64>, gamma: ArrayView1<f64>,
    ) -> f64 {
        if !in_unit_interval(gamma) || !in_unit_interval(theta_lineup) {
            return LOG_LIKELIHOOD_FLOOR;
        }
        let freqs = self.pattern_frequencies(theta_lineup, gamma);
        let mut ll: f64 = counts.iter().zip(freqs.iter()).map(|(&c, &p)| xlogy(c, p)).sum();
        if self.use_priors {
            ll += log_accuracy_prior(theta_lineup);
        }
        if ll.is_finite() { ll } else { LOG_LIKELIHOOD_FLOOR }
    }

    /// Log-likelihood of all lineups of the design.
    ///
    /// Lineup `l` uses the accuracies of `design.lineup(l)`. If any lineup
    /// hits the floor, the total is [`LOG_LIKELIHOOD_FLOOR`].
    ///
    /// # Errors
    /// - [`ModelError::InvalidNClasses`] for an empty `gamma`.
    /// - [`ModelError::ThetaLengthMismatch`] unless `theta` has one entry per
    ///   annotator of the design.
    /// - Shape errors from [`AnnotationCounts::check_shape`] when `counts` do
    ///   not match `gamma.len()` classes and the design.
    pub fn log_likelihood_counts(
        &self, counts: &AnnotationCounts, gamma: ArrayView1<f64>, theta: ArrayView1<f64>,
    ) -> ModelResult<f64> {
        validate_nclasses(gamma.len())?;
        if theta.len() != self.design.nannotators() {
            return Err(ModelError::ThetaLengthMismatch {
                expected: self.design.nannotators(),
                found: theta.len(),
            });
        }
        counts.check_shape(gamma.len(), &self.design)?;
        let mut total = 0.0;
        for (l, members) in self.design.lineups().enumerate() {
            let theta_lineup = theta.select(Axis(0), members);
            let ll = self.log_likelihood_triplet(counts.lineup(l), theta_lineup.view(), gamma);
            if ll <= LOG_LIKELIHOOD_FLOOR {
                return Ok(LOG_LIKELIHOOD_FLOOR);
            }
            total += ll;
        }
        Ok(total)
    }
}

// ---- Helper Methods ----

fn in_unit_interval(values: ArrayView1<f64>) -> bool {
    values.iter().all(|v| (0.0..=1.0).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    fn engine(use_priors: bool) -> LikelihoodEngine {
        LikelihoodEngine::new(
            LoopDesign::standard(),
            Arc::new(CombinationCache::new()),
            use_priors,
        )
    }

    #[test]
    // Purpose
    // -------
    // Pattern frequencies form a distribution over all K³ patterns.
    //
    // Given
    // -----
    // - K ∈ {2, 3, 5} with uneven priors and accuracies.
    //
    // Expect
    // ------
    // - Length K³, non-negative entries, sum 1 within 1e-12.
    fn pattern_frequencies_sum_to_one() {
        let engine = engine(false);
        let cases = [
            (array![0.3, 0.7], array![0.9, 0.6, 0.75]),
            (array![0.2, 0.5, 0.3], array![0.55, 0.99, 0.1]),
            (array![0.1, 0.1, 0.2, 0.3, 0.3], array![1.0, 0.0, 0.5]),
        ];
        for (gamma, theta) in cases {
            let freqs = engine.pattern_frequencies(theta.view(), gamma.view());
            assert_eq!(freqs.len(), gamma.len().pow(3));
            assert!(freqs.iter().all(|p| *p >= 0.0));
            assert_abs_diff_eq!(freqs.sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Pattern frequencies match a hand computation.
    //
    // Given
    // -----
    // - K = 2, gamma = [0.4, 0.6], theta = [0.9, 0.8, 0.7].
    //
    // Expect
    // ------
    // - P(0,0,0) = 0.4·0.9·0.8·0.7 + 0.6·0.1·0.2·0.3 = 0.2052.
    // - P(0,1,1) (index 3) = 0.4·0.9·0.2·0.3 + 0.6·0.1·0.8·0.7 = 0.0552.
    fn pattern_frequencies_match_hand_computation() {
        let freqs = engine(false)
            .pattern_frequencies(array![0.9, 0.8, 0.7].view(), array![0.4, 0.6].view());
        assert_abs_diff_eq!(freqs[0], 0.2052, epsilon = 1e-12);
        assert_abs_diff_eq!(freqs[3], 0.0552, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A single class puts all mass on the single pattern, whatever theta.
    fn single_class_puts_all_mass_on_one_pattern() {
        let engine = engine(false);
        let freqs = engine.pattern_frequencies(array![0.3, 0.6, 0.9].view(), array![1.0].view());
        assert_eq!(freqs, array![1.0]);

        let ll = engine.log_likelihood_triplet(
            array![12.0].view(),
            array![0.3, 0.6, 0.9].view(),
            array![1.0].view(),
        );
        assert_abs_diff_eq!(ll, 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain parameters and impossible data return the floor instead
    // of NaN or -inf.
    //
    // Given
    // -----
    // - theta_0 = 1.5; gamma with a negative entry; theta = 1 for every
    //   annotator with counts on a disagreeing pattern.
    //
    // Expect
    // ------
    // - `LOG_LIKELIHOOD_FLOOR` for all three.
    fn out_of_domain_and_impossible_data_hit_the_floor() {
        let engine = engine(false);
        let counts = Array2::from_elem((8, 8), 3.0);
        let counts = AnnotationCounts::new(counts).expect("valid counts");
        let gamma = array![0.5, 0.5];

        let mut theta = Array1::from_elem(8, 0.8);
        theta[0] = 1.5;
        assert_eq!(
            engine.log_likelihood_counts(&counts, gamma.view(), theta.view()),
            Ok(LOG_LIKELIHOOD_FLOOR)
        );

        let bad_gamma = array![1.2, -0.2];
        let ok_theta = Array1::from_elem(8, 0.8);
        assert_eq!(
            engine.log_likelihood_counts(&counts, bad_gamma.view(), ok_theta.view()),
            Ok(LOG_LIKELIHOOD_FLOOR)
        );

        let perfect = Array1::from_elem(8, 1.0);
        assert_eq!(
            engine.log_likelihood_counts(&counts, gamma.view(), perfect.view()),
            Ok(LOG_LIKELIHOOD_FLOOR)
        );
    }

    #[test]
    // Purpose
    // -------
    // The triplet log-likelihood is the count-weighted log frequency plus
    // the prior when enabled.
    //
    // Given
    // -----
    // - K = 2, counts [5, 0, 0, 0, 0, 0, 0, 3], gamma = [0.5, 0.5],
    //   theta = [0.9, 0.9, 0.9].
    //
    // Expect
    // ------
    // - Without priors: 5·ln P(000) + 3·ln P(111), P = 0.5·0.729 + 0.5·0.001.
    // - With priors: plus 3·ln(1.8).
    fn triplet_log_likelihood_adds_prior_when_enabled() {
        let counts = array![5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0];
        let theta = array![0.9, 0.9, 0.9];
        let gamma = array![0.5, 0.5];
        let p: f64 = 0.5 * 0.729 + 0.5 * 0.001;

        let plain = engine(false).log_likelihood_triplet(counts.view(), theta.view(), gamma.view());
        let with_prior =
            engine(true).log_likelihood_triplet(counts.view(), theta.view(), gamma.view());

        assert_abs_diff_eq!(plain, 8.0 * p.ln(), epsilon = 1e-10);
        assert_abs_diff_eq!(with_prior - plain, 3.0 * 1.8_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // The model log-likelihood is a pure sum over lineups.
    //
    // Given
    // -----
    // - Random-looking integer counts for K = 2 and uneven accuracies.
    //
    // Expect
    // ------
    // - `log_likelihood_counts` equals the sum of per-lineup values taken in
    //   reverse lineup order.
    fn model_log_likelihood_is_order_free_sum_of_lineups() {
        let engine = engine(true);
        let raw = Array2::from_shape_fn((8, 8), |(p, l)| ((p * 7 + l * 3) % 11) as f64);
        let counts = AnnotationCounts::new(raw).expect("valid counts");
        let gamma = array![0.35, 0.65];
        let theta = array![0.9, 0.85, 0.8, 0.75, 0.7, 0.65, 0.6, 0.95];

        let total = engine
            .log_likelihood_counts(&counts, gamma.view(), theta.view())
            .expect("matching shapes");
        let reversed: f64 = (0..8)
            .rev()
            .map(|l| {
                let members = engine.design().lineup(l);
                let theta_lineup = theta.select(Axis(0), members);
                engine.log_likelihood_triplet(counts.lineup(l), theta_lineup.view(), gamma.view())
            })
            .sum();

        assert_abs_diff_eq!(total, reversed, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // The model log-likelihood refuses counts or accuracies that do not
    // match the class count and design.
    //
    // Given
    // -----
    // - 27-pattern (K = 3) counts scored with a two-class gamma.
    // - 8-pattern counts with 7 accuracies.
    // - An empty gamma.
    //
    // Expect
    // ------
    // - `PatternCountMismatch`, `ThetaLengthMismatch` and `InvalidNClasses`.
    fn model_log_likelihood_rejects_mismatched_shapes() {
        let engine = engine(false);
        let three_class = AnnotationCounts::new(Array2::from_elem((27, 8), 1.0))
            .expect("valid counts");
        let two_class =
            AnnotationCounts::new(Array2::from_elem((8, 8), 1.0)).expect("valid counts");
        let gamma = array![0.5, 0.5];
        let theta = Array1::from_elem(8, 0.8);

        assert_eq!(
            engine.log_likelihood_counts(&three_class, gamma.view(), theta.view()),
            Err(ModelError::PatternCountMismatch { expected: 8, found: 27 })
        );
        assert_eq!(
            engine.log_likelihood_counts(&two_class, gamma.view(), theta.slice(ndarray::s![..7])),
            Err(ModelError::ThetaLengthMismatch { expected: 8, found: 7 })
        );
        assert!(matches!(
            engine.log_likelihood_counts(&two_class, Array1::zeros(0).view(), theta.view()),
            Err(ModelError::InvalidNClasses { .. })
        ));
    }
}
