use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;

/// Selects which loss the training loop uses.
///
/// - `SoftmaxCrossEntropy`      — fused softmax + cross-entropy; the output layer
///   must use the Identity activation (the loss applies softmax itself).
/// - `CategoricalCrossEntropy`  — pair with a Softmax output layer; the gradient
///   flows back through the full softmax Jacobian.
/// - `BinaryCrossEntropy`       — pair with a Sigmoid output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    SoftmaxCrossEntropy,
    CategoricalCrossEntropy,
    BinaryCrossEntropy,
}

impl LossType {
    pub fn name(&self) -> &'static str {
        match self {
            LossType::SoftmaxCrossEntropy => "softmax_cross_entropy",
            LossType::CategoricalCrossEntropy => "categorical_cross_entropy",
            LossType::BinaryCrossEntropy => "binary_cross_entropy",
        }
    }

    /// Activation the output layer must use for this loss's gradient to be exact.
    pub fn output_activation(&self) -> ActivationFunction {
        match self {
            LossType::SoftmaxCrossEntropy => ActivationFunction::Identity,
            LossType::CategoricalCrossEntropy => ActivationFunction::Softmax,
            LossType::BinaryCrossEntropy => ActivationFunction::Sigmoid,
        }
    }
}
