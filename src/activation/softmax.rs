use crate::math::matrix::Matrix;

/// Row-wise softmax over a batch of logits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Softmax;

impl Softmax {
    pub fn new() -> Self {
        Softmax
    }

    /// Class probabilities per row. The row max is subtracted before
    /// exponentiating, so large logits do not overflow.
    pub fn forward(&self, inputs: &Matrix) -> Matrix {
        let data = inputs.data.iter()
            .map(|row| {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exps: Vec<f64> = row.iter().map(|x| (x - max).exp()).collect();
                let total: f64 = exps.iter().sum();
                exps.into_iter().map(|e| e / total).collect()
            })
            .collect();
        Matrix { rows: inputs.rows, cols: inputs.cols, data }
    }

    /// Gradient w.r.t. the logits given the forward `output` and the upstream
    /// gradient `dvalues`, using the full per-sample Jacobian
    ///   J = diag(s) - s·sᵀ
    pub fn backward(&self, output: &Matrix, dvalues: &Matrix) -> Matrix {
        assert_eq!(output.shape(), dvalues.shape(), "Matrices are of incorrect sizes");
        let data = output.data.iter()
            .zip(dvalues.data.iter())
            .map(|(s, d)| {
                // J·d = s ⊙ (d - s·d)
                let dot: f64 = s.iter().zip(d.iter()).map(|(a, b)| a * b).sum();
                s.iter().zip(d.iter()).map(|(si, di)| si * (di - dot)).collect()
            })
            .collect();
        Matrix { rows: output.rows, cols: output.cols, data }
    }
}
