use crate::{
    math::matrix::Matrix,
    activation::activation::ActivationFunction,
    loss::regularization::{Regularized, Regularizer},
};

/// Parameter and input gradients produced by `Layer::backward`.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    /// ∂L/∂W including the regularization term.
    pub weights: Matrix,
    /// ∂L/∂b including the regularization term.
    pub biases: Matrix,
    /// ∂L/∂inputs, handed to the previous layer.
    pub inputs: Matrix,
}

/// Fully connected layer over a batch: `a = act(inputs · W + b)`.
#[derive(Debug)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,  // (input_size, size)
    pub biases: Matrix,   // (1, size)
    pub activator: ActivationFunction,
    pub regularizer: Regularizer,
    inputs: Matrix,
    pre_activations: Matrix,  // z = inputs · W + b, needed for the activation derivative
    outputs: Matrix,
}

impl Layer {
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size),
            _ => Matrix::xavier(input_size, size),
        };

        Layer {
            size,
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            regularizer: Regularizer::default(),
            inputs: Matrix::default(),
            pre_activations: Matrix::default(),
            outputs: Matrix::default(),
        }
    }

    pub fn with_regularizer(mut self, regularizer: Regularizer) -> Layer {
        self.regularizer = regularizer;
        self
    }

    /// Batch forward pass; caches what `backward` needs.
    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        let z = (inputs.clone() * self.weights.clone()).add_row(&self.biases);
        let a = self.activator.forward(&z);
        self.inputs = inputs.clone();
        self.pre_activations = z;
        self.outputs = a.clone();
        a
    }

    /// Last forward output.
    pub fn output(&self) -> &Matrix {
        &self.outputs
    }

    /// `dvalues` is ∂L/∂a for this layer's last forward batch. When
    /// `skip_activation` is set, `dvalues` is taken as ∂L/∂z directly (used
    /// when a fused loss already differentiated through the activation).
    pub fn backward(&self, dvalues: &Matrix, skip_activation: bool) -> LayerGradients {
        let delta = if skip_activation {
            dvalues.clone()
        } else {
            self.activator.backward(&self.pre_activations, &self.outputs, dvalues)
        };

        let mut weights = self.inputs.transpose() * delta.clone();
        let mut biases = delta.sum_rows();
        if self.regularizer.is_enabled() {
            weights = weights + self.regularizer.weight_gradient(&self.weights);
            biases = biases + self.regularizer.bias_gradient(&self.biases);
        }
        let inputs = delta * self.weights.transpose();

        LayerGradients { weights, biases, inputs }
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights = self.weights.clone() - weights_grad.scale(lr);
        self.biases = self.biases.clone() - biases_grad.scale(lr);
    }
}

impl Regularized for Layer {
    fn weights(&self) -> &Matrix {
        &self.weights
    }

    fn biases(&self) -> &Matrix {
        &self.biases
    }

    fn regularizer(&self) -> &Regularizer {
        &self.regularizer
    }
}
