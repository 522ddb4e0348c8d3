//! model_bt: Model B-with-theta for annotator reliability.
//!
//! Purpose
//! -------
//! Estimate per-annotator accuracies and the class prior from noisy
//! categorical annotations collected under a cyclic loop design (by default
//! 8 annotators, 3 per item). Each item's true class is drawn from `gamma`;
//! annotator `j` reports it with probability `theta_j` and otherwise a
//! uniformly chosen wrong class.
//!
//! Key behaviors
//! -------------
//! - [`core`]: design, combination cache, parameters, counts, likelihood,
//!   prior, options and validation.
//! - [`models`]: [`ModelBt`] (fit / score / simulate) and [`Simulator`].
//! - [`errors`]: [`ModelError`] / [`ModelResult`].
//!
//! Conventions
//! -----------
//! - Structural problems (shapes, counts, labels, design) are errors and are
//!   detected before optimizing. Parameter excursions during a search are
//!   not; they score the likelihood floor.
//! - Fits report budget exhaustion through `OptimOutcome::converged`.
//! - The stack logs through the `log` facade and never installs a logger.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use rand::{SeedableRng, rngs::StdRng};
//! use rust_annotations::model_bt::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let truth = ModelBt::random_model(3, LoopDesign::standard(), FitOptions::default(), &mut rng)?;
//! let labels = truth.generate_labels(8_000, &mut rng)?;
//! let annotations = truth.generate_annotations(&labels, &mut rng)?;
//!
//! let mut model = ModelBt::random_model(3, LoopDesign::standard(), FitOptions::default(), &mut rng)?;
//! model.mle(annotations.view())?;
//! println!("theta = {}", model.params.theta);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{
    AnnotationCounts, CombinationCache, FitOptions, LikelihoodEngine, LoopDesign, ModelParameters,
    Parameterization,
};
pub use self::errors::{ModelError, ModelResult};
pub use self::models::{ModelBt, Simulator};

pub mod prelude {
    pub use super::core::{
        AnnotationCounts, CombinationCache, FitOptions, LoopDesign, MISSING_VALUE, ModelParameters,
        Parameterization,
    };
    pub use super::errors::{ModelError, ModelResult};
    pub use super::models::{ModelBt, Simulator};
}
