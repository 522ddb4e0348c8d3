//! rust_annotations: annotator reliability from noisy categorical labels.
//!
//! Purpose
//! -------
//! Serve as the crate root for Model B-with-theta: exact likelihoods of
//! label patterns under a cyclic annotation design, maximum-likelihood
//! estimation of annotator accuracies and class priors, and simulation of
//! synthetic annotations for validation studies.
//!
//! Key behaviors
//! -------------
//! - [`model_bt`]: the model itself (design, counts, likelihood, fitting,
//!   simulation) and its error type.
//! - [`optimization`]: the Argmin-backed log-likelihood maximizer, numerical
//!   transforms, and optimizer errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is synchronous and single-threaded per call. The only
//!   shared state is the [`CombinationCache`](model_bt::CombinationCache),
//!   which is safe to share between threads.
//! - Ingestion of raw annotation files and plotting are out of scope; the
//!   crate consumes integer annotation matrices or pattern counts and
//!   returns parameters, log-likelihoods and synthetic data.
//!
//! Conventions
//! -----------
//! - Errors are surfaced as [`ModelError`](model_bt::ModelError) (structural
//!   problems) and [`OptError`](optimization::errors::OptError) (everything a
//!   fit can report, wrapping `ModelError`).
//! - Diagnostics go through the `log` facade; binaries choose the logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds the end-to-end
//!   simulate → count → fit pipeline.

pub mod model_bt;
pub mod optimization;
