use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::activation::softmax::Softmax;
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    /// Vector-valued: applied per row by `Softmax`, never element-wise.
    Softmax,
    Tanh,
}

impl ActivationFunction {
    /// Element-wise activation. Not defined for `Softmax`; use `forward`.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::function() must not be called directly; \
                        use ActivationFunction::forward() which applies the row-wise softmax.")
            }
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Element-wise derivative at the pre-activation `x`. Not defined for
    /// `Softmax`; use `backward`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::derivative() must not be called directly; \
                        use ActivationFunction::backward() which applies the softmax Jacobian.")
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Identity => "identity",
            ActivationFunction::Softmax => "softmax",
            ActivationFunction::Tanh => "tanh",
        }
    }

    /// Batch activation of the pre-activations `z`.
    pub fn forward(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => Softmax::new().forward(z),
            _ => z.map(|x| self.function(x)),
        }
    }

    /// Gradient w.r.t. `z` given the upstream gradient w.r.t. the activation.
    /// `output` is the forward result for `z`.
    pub fn backward(&self, z: &Matrix, output: &Matrix, dvalues: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => Softmax::new().backward(output, dvalues),
            _ => dvalues.hadamard(&z.map(|x| self.derivative(x))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn relu_gates_gradient() {
        let z = Matrix::from_data(vec![vec![-1.0, 2.0]]);
        let act = ActivationFunction::ReLU;
        let out = act.forward(&z);
        assert_eq!(out.data, vec![vec![0.0, 2.0]]);
        let grad = act.backward(&z, &out, &Matrix::from_data(vec![vec![5.0, 5.0]]));
        assert_eq!(grad.data, vec![vec![0.0, 5.0]]);
    }

    #[test]
    fn sigmoid_derivative_peaks_at_zero() {
        assert_abs_diff_eq!(ActivationFunction::Sigmoid.function(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ActivationFunction::Sigmoid.derivative(0.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn softmax_is_row_wise() {
        let z = Matrix::from_data(vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
        let out = ActivationFunction::Softmax.forward(&z);
        assert_eq!(out.data, vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
    }
}
