use crate::{
    activation::activation::ActivationFunction,
    layers::dense::{Layer, LayerGradients},
    loss::regularization::{regularization_loss, Regularizer},
    math::matrix::Matrix,
};

pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers }
    }

    /// Sets the same regularizer on every layer except the output layer.
    pub fn set_hidden_regularizer(&mut self, regularizer: Regularizer) {
        let hidden = self.layers.len().saturating_sub(1);
        for layer in &mut self.layers[..hidden] {
            layer.regularizer = regularizer;
        }
    }

    /// Batch forward pass; every layer caches its inputs for `backward`.
    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        let mut current = inputs.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Backpropagates ∂L/∂output through every layer and returns the
    /// parameter gradients in layer order. With `fused_output` set, `dvalues`
    /// is already the gradient w.r.t. the output layer's pre-activations.
    pub fn backward(&self, dvalues: &Matrix, fused_output: bool) -> Vec<LayerGradients> {
        let last = self.layers.len().saturating_sub(1);
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut delta = dvalues.clone();
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let layer_grads = layer.backward(&delta, fused_output && i == last);
            delta = layer_grads.inputs.clone();
            grads.push(layer_grads);
        }
        grads.reverse();
        grads
    }

    /// Sum of the regularization losses of all layers.
    pub fn regularization_loss(&self) -> f64 {
        self.layers.iter().map(regularization_loss).sum()
    }
}
