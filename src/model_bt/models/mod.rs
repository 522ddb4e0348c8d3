//! models: user-facing Model B-with-theta API and simulator.
//!
//! Purpose
//! -------
//! Sit on top of `model_bt::core`: [`ModelBt`] ties parameters, the
//! likelihood engine and the generic log-likelihood optimizer together;
//! [`Simulator`] draws synthetic labels and loop-masked annotations.
//!
//! Downstream usage
//! ----------------
//! - Build a [`ModelBt`] from parameters (or `ModelBt::random_model`), then
//!   `fit(&counts)` or `mle(annotations)`; read `params` and `results`.
//! - Use `generate_labels` / `generate_annotations` (or a [`Simulator`]
//!   directly) for simulation studies.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`model_bt`] cover `LogLikelihood` conformance, the shape
//!   of the likelihood around the generating accuracy, and seeded fits with
//!   both solver families.
//! - Unit tests in [`simulate`] cover label frequencies, masking and
//!   structural errors.

pub mod model_bt;
pub mod simulate;

pub use self::model_bt::ModelBt;
pub use self::simulate::{Simulator, apply_loop_mask};

pub mod prelude {
    pub use super::model_bt::ModelBt;
    pub use super::simulate::Simulator;
}
