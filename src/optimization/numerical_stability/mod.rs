//! numerical_stability: guarded transforms between model and optimizer space.
//!
//! Purpose
//! -------
//! Keep probability-valued parameters (class priors on the simplex,
//! per-annotator accuracies in `[0, 1]`) representable as unconstrained real
//! vectors, and evaluate `x·ln y` terms without `0·(-∞) = NaN` accidents.
//!
//! Testing notes
//! -------------
//! - Unit tests check inverse pairs (`logistic ∘ logit`, softmax with
//!   baseline vs. its inverse), tail behavior for large |x|, and the
//!   `xlogy` zero convention.

pub mod transformations;

pub use self::transformations::{
    LOGIT_EPS, baseline_softmax, baseline_softmax_inv, safe_logistic, safe_logit, xlogy,
};

pub mod prelude {
    pub use super::transformations::{
        LOGIT_EPS, baseline_softmax, baseline_softmax_inv, safe_logistic, safe_logit, xlogy,
    };
}
