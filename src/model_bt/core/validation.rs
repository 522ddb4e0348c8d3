//! Model B-with-theta validation helpers.
//!
//! Purpose
//! -------
//! Centralize the structural checks applied at API boundaries: class count,
//! class-prior vector, annotator accuracies, flat parameter-vector length,
//! and individual pattern counts. Constructors call these so that downstream
//! code (likelihood, simulator, fitter) can assume well-formed inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - `gamma` is a probability vector: finite entries in `[0, 1]` summing to 1
//!   within [`GAMMA_SUM_TOL`].
//! - `theta` entries are finite and in `[0, 1]`.
//! - Counts are finite, non-negative and integer-valued.
//!
//! Conventions
//! -----------
//! - Helpers return [`ModelResult`] and never panic on bad input.
//! - No I/O and no logging.
//! - These checks are for construction, not for optimizer iterates: the
//!   likelihood maps out-of-domain iterates to its floor value instead.
use crate::model_bt::errors::{ModelError, ModelResult};
use ndarray::ArrayView1;

/// Tolerance on `|Σ gamma - 1|`.
pub const GAMMA_SUM_TOL: f64 = 1e-8;

/// Reject `nclasses == 0`.
pub fn validate_nclasses(nclasses: usize) -> ModelResult<()> {
    if nclasses == 0 {
        return Err(ModelError::InvalidNClasses {
            nclasses,
            reason: "At least one class is required.",
        });
    }
    Ok(())
}

/// Validate a class-prior vector of expected length `nclasses`.
///
/// # Errors
/// - [`ModelError::GammaLengthMismatch`] on a wrong length.
/// - [`ModelError::InvalidGammaEntry`] for non-finite or out-of-range entries.
/// - [`ModelError::GammaNotNormalized`] if the entries do not sum to 1.
pub fn validate_gamma(gamma: ArrayView1<f64>, nclasses: usize) -> ModelResult<()> {
    if gamma.len() != nclasses {
        return Err(ModelError::GammaLengthMismatch { expected: nclasses, found: gamma.len() });
    }
    for (index, &value) in gamma.iter().enumerate() {
        if !value.is_finite() {
            return Err(ModelError::InvalidGammaEntry {
                index,
                value,
                reason: "Class probabilities must be finite.",
            });
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidGammaEntry {
                index,
                value,
                reason: "Class probabilities must lie in [0, 1].",
            });
        }
    }
    let sum = gamma.sum();
    if (sum - 1.0).abs() > GAMMA_SUM_TOL {
        return Err(ModelError::GammaNotNormalized { sum });
    }
    Ok(())
}

/// Validate annotator accuracies of expected length `nannotators`.
///
/// # Errors
/// - [`ModelError::ThetaLengthMismatch`] on a wrong length.
/// - [`ModelError::InvalidThetaEntry`] for non-finite or out-of-range entries.
pub fn validate_theta(theta: ArrayView1<f64>, nannotators: usize) -> ModelResult<()> {
    if theta.len() != nannotators {
        return Err(ModelError::ThetaLengthMismatch { expected: nannotators, found: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidThetaEntry {
                index,
                value,
                reason: "Annotator accuracies must be finite and lie in [0, 1].",
            });
        }
    }
    Ok(())
}

/// Check the flat optimizer vector length `(nclasses - 1) + nannotators`.
pub fn validate_param_vector_len(
    len: usize, nclasses: usize, nannotators: usize,
) -> ModelResult<()> {
    let expected = nclasses - 1 + nannotators;
    if len != expected {
        return Err(ModelError::ParamVectorLengthMismatch { expected, found: len });
    }
    Ok(())
}

/// Validate one pattern count.
///
/// # Errors
/// [`ModelError::InvalidCount`] if `value` is non-finite, negative, or not an
/// integer.
pub fn validate_count(value: f64, pattern: usize, lineup: usize) -> ModelResult<()> {
    let reason = if !value.is_finite() {
        "Counts must be finite."
    } else if value < 0.0 {
        "Counts must be non-negative."
    } else if value.fract() != 0.0 {
        "Counts must be integers."
    } else {
        return Ok(());
    };
    Err(ModelError::InvalidCount { pattern, lineup, value, reason })
}
