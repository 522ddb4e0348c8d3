//! Model B-with-theta options: configuration for maximum-likelihood fits.
//!
//! Purpose
//! -------
//! Collect the knobs of a fit in one place: whether the accuracy prior is
//! added, how the class prior is seeded, which optimizer-space layout is
//! searched, the optimizer settings, and an optional RNG seed for the random
//! starting point.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`FitOptions`] assumes its [`MLEOptions`] were validated by their own
//!   builders; it imposes no cross-field checks.
//!
//! Conventions
//! -----------
//! - Defaults: priors on, empirical class-prior seed on, direct layout,
//!   Nelder–Mead with cost tolerance `1e-4` and a budget of 100 000
//!   iterations, entropy-seeded RNG.
//!
//! Testing notes
//! -------------
//! - Unit tests check the defaults and the encode/decode pairing of each
//!   [`Parameterization`].
use crate::{
    model_bt::{core::params::ModelParameters, errors::ModelResult},
    optimization::loglik_optimizer::{MLEOptions, Theta},
};
use ndarray::ArrayView1;

/// Optimizer-space layout of [`ModelParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parameterization {
    /// `[gamma[0..K-1], theta]`; iterates may leave the domain and score the
    /// likelihood floor.
    #[default]
    Direct,
    /// `[log-ratios of gamma against its last class, logit(theta)]`; every
    /// iterate is inside the domain.
    Unconstrained,
}

impl Parameterization {
    /// Map parameters into optimizer space.
    pub fn encode(&self, params: &ModelParameters) -> Theta {
        match self {
            Parameterization::Direct => params.to_vector(),
            Parameterization::Unconstrained => params.to_unconstrained(),
        }
    }

    /// Map an optimizer vector back to parameters.
    ///
    /// # Errors
    /// Length errors from [`ModelParameters::from_vector`] /
    /// [`ModelParameters::from_unconstrained`].
    pub fn decode(&self, vector: ArrayView1<f64>, nclasses: usize) -> ModelResult<ModelParameters> {
        match self {
            Parameterization::Direct => ModelParameters::from_vector(vector, nclasses),
            Parameterization::Unconstrained => {
                ModelParameters::from_unconstrained(vector, nclasses)
            }
        }
    }
}

/// Fit-time configuration for [`ModelBt`](crate::model_bt::models::ModelBt).
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Add the `Beta(2, 1)` accuracy prior to the log-likelihood.
    pub use_priors: bool,
    /// Seed `gamma` from the empirical class frequencies instead of a
    /// Dirichlet draw.
    pub use_omegas: bool,
    pub parameterization: Parameterization,
    pub mle_opts: MLEOptions,
    /// Seed for the random starting point; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl FitOptions {
    pub fn new(
        use_priors: bool, use_omegas: bool, parameterization: Parameterization,
        mle_opts: MLEOptions, seed: Option<u64>,
    ) -> Self {
        Self { use_priors, use_omegas, parameterization, mle_opts, seed }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            use_priors: true,
            use_omegas: true,
            parameterization: Parameterization::Direct,
            mle_opts: MLEOptions::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::SolverChoice;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Defaults describe a prior-regularized Nelder–Mead fit in the direct
    // layout.
    fn defaults_match_documented_values() {
        let opts = FitOptions::default();
        assert!(opts.use_priors);
        assert!(opts.use_omegas);
        assert_eq!(opts.parameterization, Parameterization::Direct);
        assert_eq!(opts.mle_opts.solver, SolverChoice::NelderMead);
        assert_eq!(opts.mle_opts.tols.tol_cost, Some(1e-4));
        assert_eq!(opts.seed, None);
    }

    #[test]
    // Purpose
    // -------
    // Each layout decodes what it encodes.
    //
    // Given
    // -----
    // - K = 2, gamma = [0.3, 0.7], theta = [0.8, 0.9, 0.65].
    //
    // Expect
    // ------
    // - Both layouts have length 4 and round-trip within 1e-10.
    fn each_layout_round_trips() {
        let params =
            ModelParameters::new(array![0.3, 0.7], array![0.8, 0.9, 0.65]).expect("valid");
        for layout in [Parameterization::Direct, Parameterization::Unconstrained] {
            let encoded = layout.encode(&params);
            let decoded = layout.decode(encoded.view(), 2).expect("valid length");
            assert_eq!(encoded.len(), 4);
            for (a, b) in decoded.gamma.iter().zip(params.gamma.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-10);
            }
            for (a, b) in decoded.theta.iter().zip(params.theta.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-10);
            }
        }
    }
}
