use crate::loss::{clip_probabilities, Labels, Loss, Result};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy over probability rows (e.g. a Softmax output).
///
/// Forward: `-ln(p[true class])` per sample, or `-ln(Σ p·y)` for one-hot /
/// distribution targets.
/// Backward: `-y / p / samples`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossEntropyLoss;

impl CategoricalCrossEntropyLoss {
    pub fn new() -> Self {
        CategoricalCrossEntropyLoss
    }
}

impl Loss for CategoricalCrossEntropyLoss {
    type Target = Labels;

    fn forward(&self, y_pred: &Matrix, y_true: &Labels) -> Result<Vec<f64>> {
        y_true.check_against(y_pred)?;
        let clipped = clip_probabilities(y_pred);

        let confidences: Vec<f64> = match y_true {
            Labels::Sparse(indices) => clipped.data.iter()
                .zip(indices.iter())
                .map(|(row, &class)| row[class])
                .collect(),
            Labels::OneHot(targets) => clipped.data.iter()
                .zip(targets.data.iter())
                .map(|(row, target)| row.iter().zip(target.iter()).map(|(p, y)| p * y).sum())
                .collect(),
        };

        Ok(confidences.into_iter().map(|c| -c.ln()).collect())
    }

    fn backward(&self, dvalues: &Matrix, y_true: &Labels) -> Result<Matrix> {
        y_true.check_against(dvalues)?;
        let samples = dvalues.rows as f64;
        let clipped = clip_probabilities(dvalues);
        let targets = y_true.to_one_hot(dvalues.cols);

        let dinputs = targets.zip_map(&clipped, |y, p| -y / p / samples);
        log::trace!("categorical cross-entropy gradient {:?}", dinputs.shape());
        Ok(dinputs)
    }
}
