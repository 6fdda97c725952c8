use serde::{Serialize, Deserialize};

use crate::loss::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// Allowed deviation of a target row's sum from 1.
const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Ground truth for the categorical losses.
///
/// - `Sparse` — one class index per sample.
/// - `OneHot` — a 0/1 indicator matrix with the same shape as the predictions.
///   Categorical cross-entropy also accepts soft rows here (non-negative,
///   summing to 1); the fused softmax loss requires strict one-hot rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Labels {
    Sparse(Vec<usize>),
    OneHot(Matrix),
}

impl Labels {
    /// Number of samples the labels describe.
    pub fn len(&self) -> usize {
        match self {
            Labels::Sparse(indices) => indices.len(),
            Labels::OneHot(matrix) => matrix.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that the labels fit a `samples × classes` prediction tensor.
    pub fn check_against(&self, predicted: &Matrix) -> Result<()> {
        if predicted.rows == 0 {
            return Err(LossError::EmptyBatch);
        }
        match self {
            Labels::Sparse(indices) => {
                if indices.len() != predicted.rows {
                    return Err(LossError::LabelCountMismatch {
                        samples: predicted.rows,
                        labels: indices.len(),
                    });
                }
                if let Some((sample, &index)) = indices.iter()
                    .enumerate()
                    .find(|(_, index)| **index >= predicted.cols)
                {
                    return Err(LossError::ClassOutOfRange {
                        sample,
                        index,
                        classes: predicted.cols,
                    });
                }
                Ok(())
            }
            Labels::OneHot(matrix) => {
                if matrix.shape() != predicted.shape() {
                    return Err(LossError::ShapeMismatch {
                        predicted: predicted.shape(),
                        expected: matrix.shape(),
                    });
                }
                if let Some(row) = matrix.data.iter().position(|values| !is_distribution(values)) {
                    return Err(LossError::MalformedOneHot { row });
                }
                Ok(())
            }
        }
    }

    /// One-hot matrix with `classes` columns. Sparse labels are expanded by
    /// selecting rows of the identity matrix; one-hot labels are returned as is.
    pub fn to_one_hot(&self, classes: usize) -> Matrix {
        match self {
            Labels::Sparse(indices) => Matrix::identity(classes).select_rows(indices),
            Labels::OneHot(matrix) => matrix.clone(),
        }
    }

    /// Class index per sample. One-hot rows must contain exactly one `1.0`
    /// and zeros elsewhere.
    pub fn to_indices(&self) -> Result<Vec<usize>> {
        match self {
            Labels::Sparse(indices) => Ok(indices.clone()),
            Labels::OneHot(matrix) => {
                for (row, values) in matrix.data.iter().enumerate() {
                    let ones = values.iter().filter(|&&v| v == 1.0).count();
                    let zeros = values.iter().filter(|&&v| v == 0.0).count();
                    if ones != 1 || ones + zeros != values.len() {
                        return Err(LossError::MalformedOneHot { row });
                    }
                }
                Ok(matrix.argmax_rows())
            }
        }
    }
}

/// Non-negative, finite entries summing to 1.
fn is_distribution(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite() && *v >= 0.0)
        && (values.iter().sum::<f64>() - 1.0).abs() <= ROW_SUM_TOLERANCE
}

impl From<Vec<usize>> for Labels {
    fn from(indices: Vec<usize>) -> Self {
        Labels::Sparse(indices)
    }
}

impl From<Matrix> for Labels {
    fn from(matrix: Matrix) -> Self {
        Labels::OneHot(matrix)
    }
}
