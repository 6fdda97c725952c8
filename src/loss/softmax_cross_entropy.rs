use crate::activation::softmax::Softmax;
use crate::loss::{mean, CategoricalCrossEntropyLoss, Labels, Loss, Result};
use crate::math::matrix::Matrix;

/// Result of the fused forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxCrossEntropyOutput {
    /// Softmax of the input logits; feed these to `backward`.
    pub probabilities: Matrix,
    pub sample_losses: Vec<f64>,
    /// Mean of `sample_losses`.
    pub data_loss: f64,
}

/// Softmax activation followed by categorical cross-entropy.
///
/// Taken together, the gradient of the loss w.r.t. the logits collapses to
///   ∂L/∂z = (ŷ - y) / samples
/// which avoids building the per-sample softmax Jacobian.
/// Only valid when this softmax is the last activation of the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftmaxCrossEntropyLoss {
    activation: Softmax,
    loss: CategoricalCrossEntropyLoss,
}

impl SoftmaxCrossEntropyLoss {
    pub fn new() -> Self {
        SoftmaxCrossEntropyLoss {
            activation: Softmax::new(),
            loss: CategoricalCrossEntropyLoss::new(),
        }
    }

    /// Applies softmax to `logits` and evaluates cross-entropy on the result.
    pub fn forward(&self, logits: &Matrix, y_true: &Labels) -> Result<SoftmaxCrossEntropyOutput> {
        let probabilities = self.activation.forward(logits);
        let sample_losses = self.loss.forward(&probabilities, y_true)?;
        let data_loss = mean(&sample_losses);
        log::debug!("softmax cross-entropy loss {:.6} over {} samples", data_loss, sample_losses.len());
        Ok(SoftmaxCrossEntropyOutput { probabilities, sample_losses, data_loss })
    }

    /// Mean loss for `logits`; shorthand for `forward(..)?.data_loss`.
    pub fn calculate(&self, logits: &Matrix, y_true: &Labels) -> Result<f64> {
        Ok(self.forward(logits, y_true)?.data_loss)
    }

    /// Gradient w.r.t. the logits.
    ///
    /// `probabilities` must be this loss's own forward output (the softmax
    /// probabilities), not a gradient from a later layer. One-hot labels must
    /// be strict one-hot rows; anything else is rejected.
    pub fn backward(&self, probabilities: &Matrix, y_true: &Labels) -> Result<Matrix> {
        y_true.check_against(probabilities)?;
        let indices = y_true.to_indices()?;
        let samples = probabilities.rows as f64;

        let mut dinputs = probabilities.clone();
        for (row, &class) in dinputs.data.iter_mut().zip(indices.iter()) {
            row[class] -= 1.0;
        }
        let dinputs = dinputs.scale(1.0 / samples);
        log::trace!("softmax cross-entropy gradient {:?}", dinputs.shape());
        Ok(dinputs)
    }

    /// Penalty contributed by one layer's parameters.
    pub fn regularization_loss(&self, layer: &dyn crate::loss::Regularized) -> f64 {
        self.loss.regularization_loss(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::LossError;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn backward_subtracts_one_at_true_class() {
        let fused = SoftmaxCrossEntropyLoss::new();
        let grad = fused.backward(
            &Matrix::from_data(vec![vec![0.7, 0.2, 0.1]]),
            &Labels::Sparse(vec![0]),
        ).unwrap();
        assert_abs_diff_eq!(grad.data[0][0], -0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(grad.data[0][1], 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(grad.data[0][2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn backward_normalizes_by_samples() {
        let fused = SoftmaxCrossEntropyLoss::new();
        let probs = Matrix::from_data(vec![vec![0.7, 0.2, 0.1], vec![0.1, 0.5, 0.4]]);
        let one_hot = Labels::OneHot(Matrix::from_data(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]));
        let grad = fused.backward(&probs, &one_hot).unwrap();
        let expected = [[-0.15, 0.1, 0.05], [0.05, -0.25, 0.2]];
        for (row, exp) in grad.data.iter().zip(expected.iter()) {
            for (g, e) in row.iter().zip(exp.iter()) {
                assert_abs_diff_eq!(g, e, epsilon = 1e-12);
            }
        }
        assert_eq!(grad, fused.backward(&probs, &Labels::Sparse(vec![0, 1])).unwrap());
    }

    #[test]
    fn malformed_one_hot_is_rejected() {
        let fused = SoftmaxCrossEntropyLoss::new();
        let probs = Matrix::from_data(vec![vec![0.5, 0.5]]);
        let soft = Labels::OneHot(Matrix::from_data(vec![vec![0.3, 0.7]]));
        assert_eq!(fused.backward(&probs, &soft), Err(LossError::MalformedOneHot { row: 0 }));
    }

    #[test]
    fn forward_returns_probabilities_and_mean() {
        let fused = SoftmaxCrossEntropyLoss::new();
        let logits = Matrix::from_data(vec![vec![2.0, 1.0, 0.1], vec![0.0, 0.0, 0.0]]);
        let out = fused.forward(&logits, &Labels::Sparse(vec![0, 2])).unwrap();
        assert_eq!(out.probabilities, Softmax::new().forward(&logits));
        assert_abs_diff_eq!(out.sample_losses[1], 3.0f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(out.data_loss, (out.sample_losses[0] + out.sample_losses[1]) / 2.0, epsilon = 1e-15);
        assert_eq!(fused.calculate(&logits, &Labels::Sparse(vec![0, 2])).unwrap(), out.data_loss);
    }

    #[test]
    fn matches_unfused_chain() {
        let fused = SoftmaxCrossEntropyLoss::new();
        let logits = Matrix::from_data(vec![vec![0.4, -1.2, 2.0, 0.0], vec![1.5, 1.5, -0.3, 0.9]]);
        let labels = Labels::Sparse(vec![2, 1]);

        let probs = fused.forward(&logits, &labels).unwrap().probabilities;
        let shortcut = fused.backward(&probs, &labels).unwrap();

        let dprobs = CategoricalCrossEntropyLoss::new().backward(&probs, &labels).unwrap();
        let chained = Softmax::new().backward(&probs, &dprobs);

        for (a, b) in shortcut.data.iter().zip(chained.data.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-9);
            }
        }
    }

    proptest! {
        #[test]
        fn gradient_signs(
            logits in prop::collection::vec(-10.0f64..10.0, 2..8),
            pick in 0usize..8,
        ) {
            let classes = logits.len();
            let class = pick % classes;
            let fused = SoftmaxCrossEntropyLoss::new();
            let labels = Labels::Sparse(vec![class]);
            let probs = fused.forward(&Matrix::from_data(vec![logits]), &labels).unwrap().probabilities;
            let grad = fused.backward(&probs, &labels).unwrap();
            for (j, g) in grad.data[0].iter().enumerate() {
                if j == class {
                    prop_assert!(*g <= 0.0);
                } else {
                    prop_assert!(*g >= 0.0);
                }
            }
        }
    }
}
