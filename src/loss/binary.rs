use crate::loss::{clip_probabilities, mean, Loss, LossError, Result};
use crate::math::matrix::Matrix;

/// Binary cross-entropy for independent sigmoid outputs (multi-label).
///
/// Forward, per sample:  mean_j -(y·ln p + (1-y)·ln(1-p))
/// Backward:             -(y/p - (1-y)/(1-p)) / outputs / samples
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCrossEntropyLoss;

impl BinaryCrossEntropyLoss {
    pub fn new() -> Self {
        BinaryCrossEntropyLoss
    }
}

fn check_shapes(y_pred: &Matrix, y_true: &Matrix) -> Result<()> {
    if y_pred.rows == 0 {
        return Err(LossError::EmptyBatch);
    }
    if y_pred.shape() != y_true.shape() {
        return Err(LossError::ShapeMismatch {
            predicted: y_pred.shape(),
            expected: y_true.shape(),
        });
    }
    Ok(())
}

impl Loss for BinaryCrossEntropyLoss {
    type Target = Matrix;

    fn forward(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<Vec<f64>> {
        check_shapes(y_pred, y_true)?;
        let clipped = clip_probabilities(y_pred);
        let elementwise = y_true.zip_map(&clipped, |y, p| -(y * p.ln() + (1.0 - y) * (1.0 - p).ln()));
        Ok(elementwise.data.iter().map(|row| mean(row)).collect())
    }

    fn backward(&self, dvalues: &Matrix, y_true: &Matrix) -> Result<Matrix> {
        check_shapes(dvalues, y_true)?;
        let samples = dvalues.rows as f64;
        let outputs = dvalues.cols as f64;
        let clipped = clip_probabilities(dvalues);

        let dinputs = y_true.zip_map(&clipped, |y, p| -(y / p - (1.0 - y) / (1.0 - p)) / outputs / samples);
        log::trace!("binary cross-entropy gradient {:?}", dinputs.shape());
        Ok(dinputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::{CLIP_MIN, CLIP_MAX};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn forward_averages_over_outputs() {
        let loss = BinaryCrossEntropyLoss::new();
        let y_pred = Matrix::from_data(vec![vec![0.9, 0.2], vec![0.5, 0.5]]);
        let y_true = Matrix::from_data(vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
        let losses = loss.forward(&y_pred, &y_true).unwrap();
        assert_abs_diff_eq!(losses[0], -(0.9f64.ln() + 0.8f64.ln()) / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(losses[1], 2.0f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(loss.calculate(&y_pred, &y_true).unwrap(), (losses[0] + losses[1]) / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn saturated_predictions_stay_finite() {
        let loss = BinaryCrossEntropyLoss::new();
        let y_pred = Matrix::from_data(vec![vec![0.0, 1.0]]);
        let y_true = Matrix::from_data(vec![vec![1.0, 0.0]]);
        let losses = loss.forward(&y_pred, &y_true).unwrap();
        assert!(losses[0].is_finite());
        let grad = loss.backward(&y_pred, &y_true).unwrap();
        assert!(grad.data[0].iter().all(|g| g.is_finite()));
        assert!(grad.data[0][0] < 0.0 && grad.data[0][1] > 0.0);
    }

    #[test]
    fn backward_normalizes_by_outputs_and_samples() {
        let loss = BinaryCrossEntropyLoss::new();
        let y_pred = Matrix::from_data(vec![vec![0.8, 0.4, 0.5], vec![0.25, 0.6, 0.1]]);
        let y_true = Matrix::from_data(vec![vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]);
        let grad = loss.backward(&y_pred, &y_true).unwrap();
        assert_abs_diff_eq!(grad.data[0][0], -(1.0 / 0.8) / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grad.data[0][1], (1.0 / 0.6) / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grad.data[1][0], (1.0 / 0.75) / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let loss = BinaryCrossEntropyLoss::new();
        assert_eq!(
            loss.forward(&Matrix::zeros(2, 3), &Matrix::zeros(2, 2)),
            Err(LossError::ShapeMismatch { predicted: (2, 3), expected: (2, 2) })
        );
        assert_eq!(loss.backward(&Matrix::default(), &Matrix::default()), Err(LossError::EmptyBatch));
    }

    fn predictions_and_targets() -> impl Strategy<Value = (Matrix, Matrix)> {
        (1usize..6, 1usize..6).prop_flat_map(|(samples, outputs)| {
            (
                prop::collection::vec(prop::collection::vec(CLIP_MIN..=CLIP_MAX, outputs), samples),
                prop::collection::vec(prop::collection::vec(prop::bool::ANY, outputs), samples),
            )
        })
        .prop_map(|(preds, bits)| {
            let targets = bits.into_iter()
                .map(|row| row.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect())
                .collect();
            (Matrix::from_data(preds), Matrix::from_data(targets))
        })
    }

    proptest! {
        #[test]
        fn clipping_is_idempotent_inside_range((y_pred, y_true) in predictions_and_targets()) {
            let loss = BinaryCrossEntropyLoss::new();
            let unclipped: Vec<f64> = y_pred.data.iter()
                .zip(y_true.data.iter())
                .map(|(p_row, y_row)| {
                    let terms: Vec<f64> = p_row.iter().zip(y_row.iter())
                        .map(|(p, y)| -(y * p.ln() + (1.0 - y) * (1.0 - p).ln()))
                        .collect();
                    mean(&terms)
                })
                .collect();
            prop_assert_eq!(loss.forward(&y_pred, &y_true).unwrap(), unclipped);

            let samples = y_pred.rows as f64;
            let outputs = y_pred.cols as f64;
            let direct = y_true.zip_map(&y_pred, |y, p| -(y / p - (1.0 - y) / (1.0 - p)) / outputs / samples);
            prop_assert_eq!(&loss.backward(&y_pred, &y_true).unwrap(), &direct);
            let reclipped = clip_probabilities(&y_pred);
            prop_assert_eq!(loss.backward(&reclipped, &y_true).unwrap(), direct);
        }

        #[test]
        fn one_loss_per_sample(samples in 1usize..10, outputs in 1usize..10) {
            let loss = BinaryCrossEntropyLoss::new();
            let y_pred = Matrix::from_data(vec![vec![0.3; outputs]; samples]);
            let y_true = Matrix::from_data(vec![vec![1.0; outputs]; samples]);
            prop_assert_eq!(loss.forward(&y_pred, &y_true).unwrap().len(), samples);
        }
    }
}
