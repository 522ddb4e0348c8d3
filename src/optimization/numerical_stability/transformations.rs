//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear maps that carry
//! probability-valued model parameters into unconstrained optimizer space
//! and back. Every function uses explicit guards so that `f64` arithmetic
//! never produces `NaN`/`inf` for finite inputs.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: clamp margin applied before `logit`/`ln` so that
//!   boundary probabilities (exactly 0 or 1) map to large but finite reals.
//! - [`safe_logistic(x)`]: `1 / (1 + exp(-x))`, ℝ → (0, 1), computed on the
//!   non-overflowing branch for each sign of `x`.
//! - [`safe_logit(p)`]: inverse of the logistic on `[0, 1]` after clamping.
//! - [`baseline_softmax(z)`]: ℝ^{K-1} → K-simplex, with the last class as
//!   the fixed baseline (its logit is pinned to 0).
//! - [`baseline_softmax_inv(p)`]: K-simplex → ℝ^{K-1}, log-ratios against the
//!   last class.
//! - [`xlogy(x, y)`]: `x · ln(y)` with the `0 · ln(0) = 0` convention.

use ndarray::Array1;

/// Clamp margin for probabilities entering `logit`/`ln`.
///
/// `logit(1 - 1e-10) ≈ 23`, comfortably inside the range where the
/// logistic still resolves differences in `f64`.
pub const LOGIT_EPS: f64 = 1e-10;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(-x))`.
///
/// For `x ≥ 0` evaluates `1 / (1 + exp(-x))`; for `x < 0` evaluates
/// `exp(x) / (1 + exp(x))`. Neither branch exponentiates a large positive
/// number.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse logistic: `logit(p) = ln(p / (1 - p))`.
///
/// `p` is first clamped to `[LOGIT_EPS, 1 - LOGIT_EPS]`, so `0` and `1` map
/// to finite values of roughly ∓23.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Softmax with the last class as baseline.
///
/// Given `z` of length `K - 1`, returns `p` of length `K` with
/// `p_k ∝ exp(z_k)` for `k < K - 1` and `p_{K-1} ∝ 1`. The maximum logit
/// (including the implicit 0) is subtracted before exponentiating.
///
/// An empty `z` yields `[1.0]` (the single-class simplex).
pub fn baseline_softmax(z: &Array1<f64>) -> Array1<f64> {
    let m = z.iter().copied().fold(0.0_f64, f64::max);
    let mut p = Array1::<f64>::zeros(z.len() + 1);
    for (k, &zk) in z.iter().enumerate() {
        p[k] = (zk - m).exp();
    }
    p[z.len()] = (-m).exp();
    let total = p.sum();
    p.mapv_inplace(|v| v / total);
    p
}

/// Inverse of [`baseline_softmax`]: `z_k = ln p_k - ln p_{K-1}`.
///
/// Entries are clamped below at `LOGIT_EPS` before taking logs. An input of
/// length 1 (or 0) yields an empty vector.
pub fn baseline_softmax_inv(p: &Array1<f64>) -> Array1<f64> {
    let k = p.len();
    if k <= 1 {
        return Array1::zeros(0);
    }
    let log_base = p[k - 1].max(LOGIT_EPS).ln();
    p.slice(ndarray::s![..k - 1]).mapv(|v| v.max(LOGIT_EPS).ln() - log_base)
}

/// `x · ln(y)` with `xlogy(0, y) = 0` for every `y ≥ 0`.
///
/// Matches the convention used when a zero-count pattern meets a
/// zero-probability pattern: the term contributes nothing.
pub fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Logistic and logit are inverses in the interior and stay finite in the
    // tails.
    //
    // Given
    // -----
    // - A grid of interior probabilities; x = ±800; p = 0 and p = 1.
    //
    // Expect
    // ------
    // - σ(logit(p)) ≈ p; σ(±800) ∈ {0, 1} without NaN; logit(0/1) finite.
    fn logistic_and_logit_are_inverse_and_finite() {
        for &p in &[0.01, 0.25, 0.5, 0.6, 0.95, 0.999] {
            assert_abs_diff_eq!(safe_logistic(safe_logit(p)), p, epsilon = 1e-12);
        }
        assert_eq!(safe_logistic(800.0), 1.0);
        assert_eq!(safe_logistic(-800.0), 0.0);
        assert!(safe_logit(0.0).is_finite() && safe_logit(0.0) < -20.0);
        assert!(safe_logit(1.0).is_finite() && safe_logit(1.0) > 20.0);
    }

    #[test]
    // Purpose
    // -------
    // The baseline softmax lands on the simplex and its inverse recovers the
    // logits.
    //
    // Given
    // -----
    // - z = [1.5, -0.3, 700.0] (one logit large enough to overflow `exp`).
    // - p = [0.2, 0.3, 0.5].
    //
    // Expect
    // ------
    // - Output sums to 1 with no NaN; softmax(inv(p)) ≈ p.
    fn baseline_softmax_is_on_simplex_and_invertible() {
        let big = baseline_softmax(&array![1.5, -0.3, 700.0]);
        assert_eq!(big.len(), 4);
        assert!(big.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert_abs_diff_eq!(big.sum(), 1.0, epsilon = 1e-12);

        let p = array![0.2, 0.3, 0.5];
        let z = baseline_softmax_inv(&p);
        assert_eq!(z.len(), 2);
        let back = baseline_softmax(&z);
        for k in 0..3 {
            assert_abs_diff_eq!(back[k], p[k], epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Single-class edge case and the `xlogy` zero convention.
    //
    // Expect
    // ------
    // - softmax([]) = [1]; inv([1]) = []; xlogy(0, 0) = 0; xlogy(2, e) = 2.
    fn degenerate_inputs_follow_conventions() {
        assert_eq!(baseline_softmax(&Array1::zeros(0)), array![1.0]);
        assert_eq!(baseline_softmax_inv(&array![1.0]).len(), 0);
        assert_eq!(xlogy(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(xlogy(2.0, std::f64::consts::E), 2.0, epsilon = 1e-12);
    }
}
