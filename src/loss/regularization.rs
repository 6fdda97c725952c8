use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// L1/L2 penalty coefficients for one layer's weights and biases.
///
/// A term only contributes when its coefficient is strictly positive; the
/// all-zero default disables regularization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regularizer {
    pub weight_l1: f64,
    pub weight_l2: f64,
    pub bias_l1: f64,
    pub bias_l2: f64,
}

impl Regularizer {
    pub fn new(weight_l1: f64, weight_l2: f64, bias_l1: f64, bias_l2: f64) -> Regularizer {
        Regularizer { weight_l1, weight_l2, bias_l1, bias_l2 }
    }

    /// Weight-only L2 penalty, the common case.
    pub fn l2(weight_l2: f64) -> Regularizer {
        Regularizer { weight_l2, ..Regularizer::default() }
    }

    pub fn is_enabled(&self) -> bool {
        self.weight_l1 > 0.0 || self.weight_l2 > 0.0 || self.bias_l1 > 0.0 || self.bias_l2 > 0.0
    }

    /// Scalar penalty:
    ///   l1·Σ|p| + l2·Σp²   for weights and biases, positive coefficients only.
    pub fn penalty(&self, weights: &Matrix, biases: &Matrix) -> f64 {
        l1_term(self.weight_l1, weights)
            + l2_term(self.weight_l2, weights)
            + l1_term(self.bias_l1, biases)
            + l2_term(self.bias_l2, biases)
    }

    /// Gradient of the weight penalty: l1·sign(w) + 2·l2·w, with sign(0) = +1.
    pub fn weight_gradient(&self, weights: &Matrix) -> Matrix {
        penalty_gradient(self.weight_l1, self.weight_l2, weights)
    }

    /// Gradient of the bias penalty; same form as `weight_gradient`.
    pub fn bias_gradient(&self, biases: &Matrix) -> Matrix {
        penalty_gradient(self.bias_l1, self.bias_l2, biases)
    }
}

fn l1_term(coefficient: f64, params: &Matrix) -> f64 {
    if coefficient > 0.0 { coefficient * params.sum_abs() } else { 0.0 }
}

fn l2_term(coefficient: f64, params: &Matrix) -> f64 {
    if coefficient > 0.0 { coefficient * params.sum_squares() } else { 0.0 }
}

fn penalty_gradient(l1: f64, l2: f64, params: &Matrix) -> Matrix {
    let l1 = l1.max(0.0);
    let l2 = l2.max(0.0);
    params.map(|p| {
        let sign = if p < 0.0 { -1.0 } else { 1.0 };
        l1 * sign + 2.0 * l2 * p
    })
}

/// Anything carrying parameters that can be penalized.
pub trait Regularized {
    fn weights(&self) -> &Matrix;
    fn biases(&self) -> &Matrix;
    fn regularizer(&self) -> &Regularizer;
}

/// Regularization loss of one layer. Callers sum this over every
/// regularized layer and add it to the data loss.
pub fn regularization_loss<R: Regularized + ?Sized>(layer: &R) -> f64 {
    layer.regularizer().penalty(layer.weights(), layer.biases())
}
