//! loglik_optimizer::builders: solver construction helpers.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind small builders that apply crate-level
//! options (tolerances, L-BFGS memory, initial simplex) so higher-level code
//! can request a configured solver without touching Argmin types.
//!
//! Key behaviors
//! -------------
//! - Build a Nelder–Mead solver whose initial simplex is derived from the
//!   starting vector with the classic 5% perturbation rule.
//! - Build L-BFGS solvers with either Hager–Zhang or More–Thuente line
//!   search, applying optional gradient and cost tolerances.
//! - Leave `max_iters` to the runner layer; builders are side-effect free.
//!
//! Conventions
//! -----------
//! - Invalid tolerances rejected by Argmin surface as [`OptError`] via the
//!   crate's `From<Error>` conversion.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, NelderMeadSimplex, SIMPLEX_NONZERO_DELTA, SIMPLEX_ZERO_DELTA, Theta,
        },
    },
};

/// Initial simplex around `theta0`: `theta0` itself plus one vertex per
/// coordinate, where vertex `i` scales coordinate `i` by `1 + 5%` (or sets
/// it to `0.00025` when it is exactly zero).
///
/// Returns `theta0.len() + 1` vertices.
pub fn initial_simplex(theta0: &Theta) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] = if vertex[i] != 0.0 {
            (1.0 + SIMPLEX_NONZERO_DELTA) * vertex[i]
        } else {
            SIMPLEX_ZERO_DELTA
        };
        vertices.push(vertex);
    }
    vertices
}

/// Construct a Nelder–Mead solver around `theta0`.
///
/// `opts.tols.tol_cost`, when present, becomes the standard-deviation
/// tolerance on the simplex costs; otherwise Argmin's default applies.
///
/// # Errors
/// Propagates Argmin's rejection of the tolerance.
pub fn build_optimizer_nelder_mead(
    theta0: &Theta, opts: &MLEOptions,
) -> OptResult<NelderMeadSimplex> {
    let mut solver = NelderMeadSimplex::new(initial_simplex(theta0));
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(c)?;
    }
    Ok(solver)
}

/// Construct L-BFGS with Hager–Zhang line search and configured tolerances.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// Construct L-BFGS with More–Thuente line search and configured tolerances.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply optional gradient and cost tolerances to an L-BFGS solver,
/// whatever its line search. `None` keeps Argmin's default.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
