//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! Selects the solver named by `opts.solver`, wraps the model in an
//! `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), and delegates to the matching
//! runner.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_optimizer_hager_zhang, build_optimizer_more_thuente, build_optimizer_nelder_mead,
        },
        run::{run_derivative_free, run_lbfgs},
        traits::{LineSearcher, LogLikelihood, MLEOptions, SolverChoice},
        validation::validate_theta0,
    },
};

/// Maximize a log-likelihood `ℓ(θ)`.
///
/// # Behavior
/// - Rejects empty or non-finite `theta0`, then runs `f.check(theta0, data)`
///   so structural problems surface before any solver work.
/// - Builds the solver chosen by `opts.solver` (Nelder–Mead around `theta0`,
///   or L-BFGS with the requested line search).
/// - Runs it to convergence or `max_iter` and returns an [`OptimOutcome`]
///   expressed in log-likelihood terms.
///
/// # Errors
/// - Propagates validation errors from `validate_theta0` and `f.check`.
/// - Propagates builder and runtime errors from Argmin.
///
/// # Example
/// ```
/// use ndarray::array;
/// use rust_annotations::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{maximize, Cost, LogLikelihood, MLEOptions, Theta},
/// };
///
/// struct Peak;
/// impl LogLikelihood for Peak {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
///         Ok(-(theta[0] - 0.3).powi(2) - (theta[1] + 0.2).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Peak, array![1.0, 1.0], &(), &MLEOptions::default())?;
/// assert!((out.theta_hat[0] - 0.3).abs() < 0.05);
/// # Ok::<(), rust_annotations::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    validate_theta0(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.solver {
        SolverChoice::NelderMead => {
            let solver = build_optimizer_nelder_mead(&theta0, opts)?;
            run_derivative_free(theta0, opts, problem, solver)
        }
        SolverChoice::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        SolverChoice::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Cost, Tolerances},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Concave quadratic with its peak at (0.3, 0.7).
    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(-(theta[0] - 0.3).powi(2) - 2.0 * (theta[1] - 0.7).powi(2))
        }

        fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::GradientDimMismatch { expected: 2, found: theta.len() });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Nelder–Mead and both L-BFGS variants find the peak of a concave
    // quadratic.
    //
    // Given
    // -----
    // - θ₀ = [0.6, 0.2]; tight cost tolerance.
    //
    // Expect
    // ------
    // - θ̂ ≈ (0.3, 0.7) and ℓ(θ̂) ≈ 0 for every solver.
    fn every_solver_recovers_quadratic_peak() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), Some(1e-12), Some(5_000)).expect("valid tolerances");
        let choices = [
            SolverChoice::NelderMead,
            SolverChoice::Lbfgs(LineSearcher::MoreThuente),
            SolverChoice::Lbfgs(LineSearcher::HagerZhang),
        ];

        for solver in choices {
            let opts = MLEOptions::new(tols, solver, None).expect("valid options");

            // Act
            let out = maximize(&Quadratic, array![0.6, 0.2], &(), &opts).expect("fit succeeds");

            // Assert
            assert_abs_diff_eq!(out.theta_hat[0], 0.3, epsilon = 1e-3);
            assert_abs_diff_eq!(out.theta_hat[1], 0.7, epsilon = 1e-3);
            assert!(out.value <= 0.0 && out.value > -1e-5, "{solver:?}: value {}", out.value);
        }
    }

    #[test]
    // Purpose
    // -------
    // Structural checks run before any solver work.
    //
    // Given
    // -----
    // - A length-3 θ₀ for a 2-parameter model, and a θ₀ containing NaN.
    //
    // Expect
    // ------
    // - The model's own check error, and `InvalidThetaInput`.
    fn maximize_validates_before_optimizing() {
        // Arrange
        let opts = MLEOptions::default();

        // Act
        let wrong_len = maximize(&Quadratic, array![0.1, 0.2, 0.3], &(), &opts);
        let nan = maximize(&Quadratic, array![0.1, f64::NAN], &(), &opts);

        // Assert
        assert_eq!(wrong_len, Err(OptError::GradientDimMismatch { expected: 2, found: 3 }));
        assert!(matches!(nan, Err(OptError::InvalidThetaInput { index: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Running out of iterations is not an error.
    //
    // Given
    // -----
    // - Nelder–Mead limited to 2 iterations.
    //
    // Expect
    // ------
    // - `Ok` outcome with `converged == false` and 2 iterations.
    fn iteration_budget_exhaustion_returns_best_so_far() {
        // Arrange
        let tols = Tolerances::new(None, Some(1e-12), Some(2)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, SolverChoice::NelderMead, None).expect("valid options");

        // Act
        let out = maximize(&Quadratic, array![0.6, 0.2], &(), &opts).expect("budget is not fatal");

        // Assert
        assert!(!out.converged);
        assert_eq!(out.iterations, 2);
        assert!(out.fn_evals.get("cost_count").copied().unwrap_or(0) > 0);
    }
}
