//! Error types for the loss module.

use thiserror::Error;

/// Loss errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LossError {
    #[error("Empty batch: at least one sample is required")]
    EmptyBatch,

    #[error("Shape mismatch: predictions are {predicted:?} but targets are {expected:?}")]
    ShapeMismatch {
        predicted: (usize, usize),
        expected: (usize, usize),
    },

    #[error("Label count mismatch: {samples} samples but {labels} labels")]
    LabelCountMismatch { samples: usize, labels: usize },

    #[error("Class index {index} at sample {sample} is out of range for {classes} classes")]
    ClassOutOfRange {
        sample: usize,
        index: usize,
        classes: usize,
    },

    #[error("Row {row} is not a one-hot vector or a target distribution")]
    MalformedOneHot { row: usize },

    #[error("Loss {loss} expects a {expected} output layer, got {found}")]
    IncompatibleActivation {
        loss: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Loss {loss} cannot be trained against {targets} targets")]
    IncompatibleTargets {
        loss: &'static str,
        targets: &'static str,
    },
}

/// Result type for loss operations
pub type Result<T> = std::result::Result<T, LossError>;
