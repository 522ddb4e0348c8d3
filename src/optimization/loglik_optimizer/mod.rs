//! loglik_optimizer: argmin-powered log-likelihood maximization.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] (or any [`Optimizer`]) to run a
//! derivative-free Nelder–Mead search or L-BFGS with a configurable line
//! search.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods into Argmin cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Validate the initial guess, build the requested solver via
//!   [`builders`], execute it via [`run`], and normalize results into an
//!   [`OptimOutcome`].
//! - Centralize configuration ([`Tolerances`], [`MLEOptions`],
//!   [`SolverChoice`]) and validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)`; user code implements `ℓ(θ)`
//!   (and optionally `∇ℓ(θ)`), never the cost directly.
//! - [`LogLikelihood::value`] must return a finite number for every finite
//!   `θ` the solver may visit; a non-finite value aborts the run with
//!   [`OptError::NonFiniteCost`](crate::optimization::errors::OptError).
//! - Exhausting `max_iter` is a normal terminal state reported through
//!   [`OptimOutcome::converged`], never an error.
//!
//! Conventions
//! -----------
//! - Parameters live in optimizer space as [`Theta`] (`Array1<f64>`); any
//!   mapping to structured model parameters happens in the model layer.
//! - All user-facing values (including [`OptimOutcome::value`]) are
//!   log-likelihoods, not costs.
//! - Progress is reported through the `log` facade (`debug!`/`warn!`);
//!   nothing is printed directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions and finite-difference
//!   gradients ([`adapter`]), solver construction ([`builders`]), option
//!   parsing and outcome invariants ([`traits`]), validators
//!   ([`validation`]), and end-to-end solves on toy objectives ([`api`]).

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Optimizer, SolverChoice, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Optimizer, SolverChoice, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
