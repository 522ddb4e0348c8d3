//! core: Model B-with-theta building blocks.
//!
//! Purpose
//! -------
//! Collect the pieces the model layer is assembled from: the loop design,
//! the pattern-table cache, parameters and their optimizer layouts, pattern
//! counts, the exact likelihood, the accuracy prior, fit options and
//! validation helpers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Lineups are sorted annotator sets; pattern indices enumerate labels over
//!   a lineup's sorted annotators with the last annotator varying fastest.
//!   Counting, combination tables and likelihood all share this order.
//! - Constructors validate; the likelihood itself never errors on parameter
//!   values and reports out-of-domain points through its floor value.

pub mod combinations;
pub mod counts;
pub mod design;
pub mod likelihood;
pub mod options;
pub mod params;
pub mod priors;
pub mod validation;

pub use self::combinations::{CombinationCache, PatternTable};
pub use self::counts::{AnnotationCounts, MISSING_VALUE};
pub use self::design::LoopDesign;
pub use self::likelihood::{LOG_LIKELIHOOD_FLOOR, LikelihoodEngine};
pub use self::options::{FitOptions, Parameterization};
pub use self::params::ModelParameters;
pub use self::priors::log_beta_pdf;
