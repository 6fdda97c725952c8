pub mod error;
pub mod labels;
pub mod regularization;
pub mod categorical;
pub mod softmax_cross_entropy;
pub mod binary;
pub mod loss_type;

pub use error::{LossError, Result};
pub use labels::Labels;
pub use regularization::{Regularized, Regularizer, regularization_loss};
pub use categorical::CategoricalCrossEntropyLoss;
pub use softmax_cross_entropy::{SoftmaxCrossEntropyLoss, SoftmaxCrossEntropyOutput};
pub use binary::BinaryCrossEntropyLoss;
pub use loss_type::LossType;

use crate::math::matrix::Matrix;

/// Lower clipping bound applied before every log/divide.
pub const CLIP_MIN: f64 = 1e-7;
/// Upper clipping bound; symmetric with `CLIP_MIN` so the mean is not dragged
/// towards either end.
pub const CLIP_MAX: f64 = 1.0 - 1e-7;

/// Clips probabilities into `[CLIP_MIN, CLIP_MAX]`.
pub fn clip_probabilities(values: &Matrix) -> Matrix {
    values.clip(CLIP_MIN, CLIP_MAX)
}

/// Fixed-order arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Shared contract of the losses: a per-sample forward pass, a gradient with
/// respect to the forward input, and the mean-reduced data loss.
pub trait Loss {
    /// Ground truth accepted by this loss.
    type Target: ?Sized;

    /// Per-sample losses, one value per row of `y_pred`.
    fn forward(&self, y_pred: &Matrix, y_true: &Self::Target) -> Result<Vec<f64>>;

    /// Gradient of the mean loss with respect to `dvalues` (the predictions),
    /// already normalized by the sample count.
    fn backward(&self, dvalues: &Matrix, y_true: &Self::Target) -> Result<Matrix>;

    /// Mean of the per-sample losses. Excludes regularization.
    fn calculate(&self, output: &Matrix, y_true: &Self::Target) -> Result<f64> {
        let sample_losses = self.forward(output, y_true)?;
        let data_loss = mean(&sample_losses);
        log::debug!("data loss {:.6} over {} samples", data_loss, sample_losses.len());
        Ok(data_loss)
    }

    /// Penalty contributed by one layer's parameters.
    fn regularization_loss(&self, layer: &dyn Regularized) -> f64 {
        regularization_loss(layer)
    }
}
