//! Beta prior on annotator accuracies.
//!
//! The MAP variant of the likelihood adds `Σ_j ln Beta(theta_j; 2, 1)` for
//! the annotators of each lineup, a weak prior tilting accuracies towards 1.
use crate::optimization::numerical_stability::transformations::xlogy;
use ndarray::ArrayView1;
use statrs::function::beta::ln_beta;

/// First shape parameter of the accuracy prior.
pub const PRIOR_ALPHA: f64 = 2.0;
/// Second shape parameter of the accuracy prior.
pub const PRIOR_BETA: f64 = 1.0;

/// Log density of `Beta(a, b)` at `x`.
///
/// Uses `0 · ln 0 = 0`, so `Beta(2, 1)` is finite at `x = 1`. Returns `-inf`
/// outside `[0, 1]` and wherever the density vanishes.
///
/// `a` and `b` must be strictly positive.
pub fn log_beta_pdf(x: f64, a: f64, b: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    xlogy(a - 1.0, x) + xlogy(b - 1.0, 1.0 - x) - ln_beta(a, b)
}

/// `Σ_j ln Beta(theta_j; PRIOR_ALPHA, PRIOR_BETA)`.
pub fn log_accuracy_prior(theta: ArrayView1<f64>) -> f64 {
    theta.iter().map(|&t| log_beta_pdf(t, PRIOR_ALPHA, PRIOR_BETA)).sum()
}
