//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! A maximization of `ℓ(θ)` becomes the minimization of `c(θ) = -ℓ(θ)`.
//! Derivative-free solvers only see [`CostFunction`]; gradient-based solvers
//! additionally call [`Gradient`], which negates an analytic `∇ℓ(θ)` or
//! finite-differences the cost directly (no sign flip in that branch).
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` and its data to `argmin`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Finite-difference gradient of the cost, central first.
    ///
    /// The FD closure must return `f64`, so the first cost error is parked in
    /// `slot` and `NaN` is returned. A parked error or a non-finite central
    /// gradient triggers one forward-difference retry; a failure there is
    /// returned to the solver.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let slot: RefCell<Option<Error>> = RefCell::new(None);
        let cost_fn = |x: &Theta| -> f64 {
            self.cost(x).unwrap_or_else(|e| {
                slot.borrow_mut().get_or_insert(e);
                f64::NAN
            })
        };
        let central = theta.central_diff(&cost_fn);
        if slot.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        slot.replace(None);
        let forward = theta.forward_diff(&cost_fn);
        if let Some(err) = slot.take() {
            return Err(err);
        }
        validate_grad(&forward, theta.len())?;
        Ok(forward)
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - [`OptError::NonFiniteCost`] when `ℓ(θ)` is `NaN` or infinite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Gradient of the cost at `θ`: `-∇ℓ(θ)` when the model provides one,
    /// a validated finite-difference gradient otherwise.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}
