//! Model B-with-theta: maximum-likelihood fitting of annotator accuracies.
//!
//! This module wires the likelihood engine to the `LogLikelihood` trait. The
//! optimizer searches over a flat vector in the layout chosen by
//! [`Parameterization`]; every evaluation decodes the vector into
//! `(gamma, theta)` and scores the pattern counts.
//!
//! Key ideas:
//! - The direct layout lets iterates leave the domain; those score the
//!   likelihood floor, which the derivative-free search steers away from.
//! - The unconstrained layout keeps every iterate in the domain and is the
//!   one to pair with L-BFGS.
//! - The objective is non-convex. A fit returns the best point of a single
//!   run; restarting from several seeds is left to the caller.
use std::sync::Arc;

use crate::{
    model_bt::{
        core::{
            combinations::CombinationCache,
            counts::AnnotationCounts,
            design::LoopDesign,
            likelihood::LikelihoodEngine,
            options::FitOptions,
            params::{ModelParameters, random_gamma, random_theta},
            validation::{
                validate_gamma, validate_nclasses, validate_param_vector_len, validate_theta,
            },
        },
        errors::{ModelError, ModelResult},
        models::simulate::Simulator,
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, OptimOutcome, Optimizer, Theta},
    },
};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Model B-with-theta under a loop design.
///
/// Holds the current parameters (initial values before a fit, estimates
/// after), the fit options, and a likelihood engine sharing a combination
/// cache. After fitting, [`results`](Self::results) stores the optimizer
/// outcome.
#[derive(Debug, Clone)]
pub struct ModelBt {
    /// Current class prior and accuracies.
    pub params: ModelParameters,
    /// Fit results (populated after `fit`).
    pub results: Option<OptimOutcome>,
    nclasses: usize,
    options: FitOptions,
    engine: LikelihoodEngine,
}

impl ModelBt {
    /// Construct a model from validated parameters with a private cache.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNClasses`] for an empty `gamma`.
    /// - [`ModelError::ThetaLengthMismatch`] unless `theta` has one entry per
    ///   annotator of `design`.
    /// - Domain errors for `gamma` / `theta`.
    pub fn new(
        params: ModelParameters, design: LoopDesign, options: FitOptions,
    ) -> ModelResult<Self> {
        Self::with_cache(params, design, options, Arc::new(CombinationCache::new()))
    }

    /// Like [`new`](Self::new), sharing `cache` with other models.
    pub fn with_cache(
        params: ModelParameters, design: LoopDesign, options: FitOptions,
        cache: Arc<CombinationCache>,
    ) -> ModelResult<Self> {
        let nclasses = params.nclasses();
        validate_nclasses(nclasses)?;
        validate_gamma(params.gamma.view(), nclasses)?;
        validate_theta(params.theta.view(), design.nannotators())?;
        let engine = LikelihoodEngine::new(design, cache, options.use_priors);
        Ok(Self { params, results: None, nclasses, options, engine })
    }

    /// Model with random `gamma ~ Dirichlet(2)` and `theta ~ U[0.6, 0.95]`.
    pub fn random_model<R: Rng + ?Sized>(
        nclasses: usize, design: LoopDesign, options: FitOptions, rng: &mut R,
    ) -> ModelResult<Self> {
        let params = ModelParameters::random(nclasses, design.nannotators(), rng)?;
        Self::new(params, design, options)
    }

    pub fn nclasses(&self) -> usize {
        self.nclasses
    }

    pub fn design(&self) -> &LoopDesign {
        self.engine.design()
    }

    pub fn engine(&self) -> &LikelihoodEngine {
        &self.engine
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Replace the fit options; the likelihood engine follows `use_priors`.
    pub fn set_options(&mut self, options: FitOptions) {
        self.engine = LikelihoodEngine::new(
            self.engine.design().clone(),
            Arc::clone(self.engine.cache()),
            options.use_priors,
        );
        self.options = options;
    }

    /// Log-likelihood of `counts` at the current parameters.
    ///
    /// # Errors
    /// Shape errors from [`AnnotationCounts::check_shape`].
    pub fn log_likelihood_counts(&self, counts: &AnnotationCounts) -> ModelResult<f64> {
        self.engine.log_likelihood_counts(
            counts,
            self.params.gamma.view(),
            self.params.theta.view(),
        )
    }

    /// Log-likelihood of a raw annotation matrix at the current parameters.
    ///
    /// # Errors
    /// Counting errors from [`AnnotationCounts::from_annotations`].
    pub fn log_likelihood(&self, annotations: ArrayView2<i64>) -> ModelResult<f64> {
        let counts = AnnotationCounts::from_annotations(annotations, self.nclasses, self.design())?;
        self.log_likelihood_counts(&counts)
    }

    /// Log-likelihood reached by the last fit.
    ///
    /// # Errors
    /// [`ModelError::ModelNotFitted`] before the first fit.
    pub fn fitted_log_likelihood(&self) -> ModelResult<f64> {
        self.results.as_ref().map(|r| r.value).ok_or(ModelError::ModelNotFitted)
    }

    /// Fit by maximum likelihood with the configured [`MLEOptions`].
    ///
    /// [`MLEOptions`]: crate::optimization::loglik_optimizer::MLEOptions
    pub fn fit(&mut self, counts: &AnnotationCounts) -> OptResult<()> {
        let optimizer = self.options.mle_opts.clone();
        self.fit_with(counts, &optimizer)
    }

    /// Fit by maximum likelihood with any [`Optimizer`].
    ///
    /// ## Steps
    /// 1. Check the count layout against the class count and design.
    /// 2. Seed `gamma` from the empirical class frequencies (`use_omegas`) or
    ///    a Dirichlet draw, and draw a fresh random `theta`.
    /// 3. Encode the start in the configured layout and maximize.
    /// 4. Decode `theta_hat` into [`params`](Self::params) and store the
    ///    outcome in [`results`](Self::results).
    ///
    /// Running out of iterations is not an error; check
    /// `results.converged`.
    ///
    /// # Errors
    /// - Structural count errors (wrapped [`ModelError`]) before any
    ///   optimization.
    /// - Optimizer configuration or backend errors.
    pub fn fit_with<O: Optimizer>(
        &mut self, counts: &AnnotationCounts, optimizer: &O,
    ) -> OptResult<()> {
        counts.check_shape(self.nclasses, self.design())?;
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let gamma0 = if self.options.use_omegas {
            counts.class_frequencies(self.nclasses, self.design())
        } else {
            random_gamma(self.nclasses, &mut rng)?
        };
        let theta0 = random_theta(self.design().nannotators(), &mut rng);
        let start = ModelParameters { gamma: gamma0, theta: theta0 };
        debug!("fit start: gamma0 = {}, theta0 = {}", start.gamma, start.theta);

        let layout = self.options.parameterization;
        let outcome = optimizer.maximize(&*self, layout.encode(&start), counts)?;
        self.params = layout.decode(outcome.theta_hat.view(), self.nclasses)?;
        info!(
            "fit finished: ell = {:.6}, converged = {}, iterations = {}",
            outcome.value, outcome.converged, outcome.iterations
        );
        self.results = Some(outcome);
        Ok(())
    }

    /// Count `annotations` and fit.
    ///
    /// # Errors
    /// Counting errors, then everything [`fit`](Self::fit) reports.
    pub fn mle(&mut self, annotations: ArrayView2<i64>) -> OptResult<()> {
        let counts = AnnotationCounts::from_annotations(annotations, self.nclasses, self.design())?;
        self.fit(&counts)
    }

    /// Draw `nitems` true labels from the current `gamma`.
    pub fn generate_labels<R: Rng + ?Sized>(
        &self, nitems: usize, rng: &mut R,
    ) -> ModelResult<Array1<usize>> {
        self.simulator()?.generate_labels(self.params.gamma.view(), nitems, rng)
    }

    /// Draw masked annotations for `labels` from the current `theta`.
    pub fn generate_annotations<R: Rng + ?Sized>(
        &self, labels: &Array1<usize>, rng: &mut R,
    ) -> ModelResult<Array2<i64>> {
        self.simulator()?.generate_annotations(self.params.theta.view(), labels.view(), rng)
    }

    fn simulator(&self) -> ModelResult<Simulator> {
        Simulator::new(self.nclasses, self.design().clone())
    }
}

impl LogLikelihood for ModelBt {
    type Data = AnnotationCounts;

    /// Log-likelihood at optimizer vector `x`.
    ///
    /// Out-of-domain points yield the likelihood floor, not an error.
    fn value(&self, x: &Theta, counts: &Self::Data) -> OptResult<f64> {
        let params = self.options.parameterization.decode(x.view(), self.nclasses)?;
        Ok(self.engine.log_likelihood_counts(counts, params.gamma.view(), params.theta.view())?)
    }

    /// Check the vector length `(K - 1) + nannotators` and the count layout.
    fn check(&self, x: &Theta, counts: &Self::Data) -> OptResult<()> {
        validate_param_vector_len(x.len(), self.nclasses, self.design().nannotators())?;
        counts.check_shape(self.nclasses, self.design())?;
        Ok(())
    }
}
