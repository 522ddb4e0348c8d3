//! Errors for Model B-with-theta (design, parameter, count and annotation
//! validation).
//!
//! This module defines [`ModelError`] and the [`ModelResult`] alias used across
//! `model_bt::core` and `model_bt::models`. Optimizer-facing code wraps these
//! errors transparently in
//! [`OptError::Model`](crate::optimization::errors::OptError).
//!
//! ## Conventions
//! - **Indices are 0-based**: annotators, lineups, patterns, rows and columns.
//! - Parameters that wander outside their domain *during a search* are never
//!   reported here; the likelihood returns its floor value instead. These
//!   variants cover structural problems detected before any optimization.

/// Result alias for model-level operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for Model B-with-theta.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    // ---- Model state ----
    /// Fit results requested before `fit` ran.
    #[error("Model has not been fitted")]
    ModelNotFitted,

    // ---- Design / shape ----
    #[error("Invalid number of classes {nclasses}: {reason}")]
    InvalidNClasses { nclasses: usize, reason: &'static str },

    #[error(
        "Invalid annotation design ({nannotators} annotators, {annotators_per_item} per item): {reason}"
    )]
    InvalidDesign { nannotators: usize, annotators_per_item: usize, reason: &'static str },

    // ---- Parameters ----
    #[error("gamma length mismatch: expected {expected}, found {found}")]
    GammaLengthMismatch { expected: usize, found: usize },

    #[error("theta length mismatch: expected {expected}, found {found}")]
    ThetaLengthMismatch { expected: usize, found: usize },

    #[error("Invalid gamma[{index}] = {value}: {reason}")]
    InvalidGammaEntry { index: usize, value: f64, reason: &'static str },

    #[error("Invalid theta[{index}] = {value}: {reason}")]
    InvalidThetaEntry { index: usize, value: f64, reason: &'static str },

    #[error("gamma must sum to 1, found {sum}")]
    GammaNotNormalized { sum: f64 },

    #[error("Parameter vector length mismatch: expected {expected}, found {found}")]
    ParamVectorLengthMismatch { expected: usize, found: usize },

    // ---- Pattern counts ----
    #[error("Lineup count mismatch: expected {expected}, found {found}")]
    LineupCountMismatch { expected: usize, found: usize },

    #[error("Pattern count mismatch: expected {expected}, found {found}")]
    PatternCountMismatch { expected: usize, found: usize },

    #[error("Invalid count {value} for pattern {pattern} of lineup {lineup}: {reason}")]
    InvalidCount { pattern: usize, lineup: usize, value: f64, reason: &'static str },

    #[error("Pattern counts are empty")]
    EmptyCounts,

    // ---- Annotation matrix ----
    #[error("Annotation matrix has {found} columns, expected {expected}")]
    AnnotationShapeMismatch { expected: usize, found: usize },

    #[error("Label {label} at row {row}, column {col} is outside [0, {nclasses})")]
    LabelOutOfRange { row: usize, col: usize, label: i64, nclasses: usize },

    #[error("True label {label} at index {index} is outside [0, {nclasses})")]
    TrueLabelOutOfRange { index: usize, label: usize, nclasses: usize },

    #[error("Row {row} is not annotated by any lineup of the design")]
    RowOutsideDesign { row: usize },

    #[error("Number of items {nitems} is not divisible by the {nblocks} lineup blocks")]
    NItemsNotDivisible { nitems: usize, nblocks: usize },

    // ---- Sampling ----
    #[error("Invalid sampling distribution: {0}")]
    InvalidDistribution(String),
}
