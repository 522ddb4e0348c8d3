//! optimization: MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to fit annotation models: an
//! Argmin-backed log-likelihood optimizer, numerically stable parameter
//! transforms, and a single error/result surface. Callers implement a
//! log-likelihood, choose a solver and tolerances, and obtain fitted
//! parameters and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: maximize `ℓ(θ)` with Nelder–Mead or L-BFGS.
//! - [`numerical_stability`]: logistic / logit / softmax maps between
//!   constrained model space and unconstrained optimizer space, plus the
//!   `x·ln y` convention used by likelihood sums.
//! - [`errors`]: [`OptError`](errors::OptError) / [`OptResult`](errors::OptResult),
//!   including transparent wrapping of model validation errors.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; user-facing
//!   APIs and outcomes are expressed in terms of `ℓ`.
//! - Public entry points that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
