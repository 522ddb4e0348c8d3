//! Execution helpers that run an `argmin` solver on a log-likelihood problem
//! and return a crate-friendly [`OptimOutcome`].
//!
//! One runner per state shape: Nelder–Mead carries no gradient in its
//! `IterState`, L-BFGS carries a [`Grad`]. Both apply `max_iter`, execute,
//! log the result, and convert the best cost back into a log-likelihood.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, IterState, Solver, State};
use log::{debug, warn};

/// Run a derivative-free solver (e.g. Nelder–Mead) to completion.
///
/// The solver owns its initial simplex, so `theta0` is only used to log the
/// starting objective and seed the executor state.
///
/// # Errors
/// - Propagates `argmin` runtime errors (including user cost errors) via
///   `From<argmin::core::Error>`.
/// - Propagates validation errors when constructing [`OptimOutcome`].
pub fn run_derivative_free<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, (), (), (), (), f64>> + 'static,
{
    log_initial_state(&theta0, &problem)?;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        result.get_termination_status().clone(),
        result.get_iter(),
        result.get_func_counts().clone(),
        None,
    )?;
    log_outcome(&outcome);
    Ok(outcome)
}

/// Run an L-BFGS solver (either line search) to completion.
///
/// # Errors
/// - Propagates `argmin` runtime errors (line-search failures, user cost or
///   gradient errors) via `From<argmin::core::Error>`.
/// - Propagates validation errors when constructing [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + 'static,
{
    log_initial_state(&theta0, &problem)?;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        result.get_termination_status().clone(),
        result.get_iter(),
        result.get_func_counts().clone(),
        grad,
    )?;
    log_outcome(&outcome);
    Ok(outcome)
}

// ---- Helper Methods ----

fn log_initial_state<F: LogLikelihood>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    let ll0 = -problem.cost(theta0)?;
    debug!("init: ell(theta0) = {ll0:.6}, dim = {}", theta0.len());
    Ok(())
}

fn log_outcome(outcome: &OptimOutcome) {
    debug!(
        "done: ell(theta_hat) = {:.6} after {} iterations ({})",
        outcome.value, outcome.iterations, outcome.status
    );
    if !outcome.converged {
        warn!(
            "optimizer stopped without meeting its tolerance: {} after {} iterations",
            outcome.status, outcome.iterations
        );
    }
}
