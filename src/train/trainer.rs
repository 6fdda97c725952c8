use crate::{
    loss::{
        BinaryCrossEntropyLoss, CategoricalCrossEntropyLoss, Labels, Loss, LossError, LossType,
        Result, SoftmaxCrossEntropyLoss,
    },
    math::matrix::Matrix,
    network::network::Network,
    optim::sgd::Sgd,
};

/// Ground truth for a training run.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Class labels for the categorical losses.
    Classes(Labels),
    /// 0/1 target matrix for binary cross-entropy.
    Binary(Matrix),
}

impl Targets {
    fn kind(&self) -> &'static str {
        match self {
            Targets::Classes(_) => "class",
            Targets::Binary(_) => "binary",
        }
    }
}

/// Losses and accuracy measured during one `train_step`, before the update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStats {
    pub data_loss: f64,
    pub regularization_loss: f64,
    pub accuracy: f64,
}

/// Fails unless the output layer's activation is the one `loss_type` is
/// derived for. A network without layers passes its inputs through unchanged
/// and is not checked.
pub fn check_output_activation(network: &Network, loss_type: LossType) -> Result<()> {
    let expected = loss_type.output_activation();
    match network.layers.last() {
        Some(layer) if layer.activator != expected => Err(LossError::IncompatibleActivation {
            loss: loss_type.name(),
            expected: expected.name(),
            found: layer.activator.name(),
        }),
        _ => Ok(()),
    }
}

/// One full-batch step: forward, data + regularization loss, backward, SGD update.
pub fn train_step(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Targets,
    loss_type: LossType,
    optimizer: &Sgd,
) -> Result<StepStats> {
    check_output_activation(network, loss_type)?;
    let output = network.forward(inputs);

    let (data_loss, predictions, dvalues, fused) = match (loss_type, targets) {
        (LossType::SoftmaxCrossEntropy, Targets::Classes(labels)) => {
            let loss = SoftmaxCrossEntropyLoss::new();
            let out = loss.forward(&output, labels)?;
            let dvalues = loss.backward(&out.probabilities, labels)?;
            (out.data_loss, out.probabilities, dvalues, true)
        }
        (LossType::CategoricalCrossEntropy, Targets::Classes(labels)) => {
            let loss = CategoricalCrossEntropyLoss::new();
            let data_loss = loss.calculate(&output, labels)?;
            let dvalues = loss.backward(&output, labels)?;
            (data_loss, output, dvalues, false)
        }
        (LossType::BinaryCrossEntropy, Targets::Binary(expected)) => {
            let loss = BinaryCrossEntropyLoss::new();
            let data_loss = loss.calculate(&output, expected)?;
            let dvalues = loss.backward(&output, expected)?;
            (data_loss, output, dvalues, false)
        }
        (loss_type, targets) => {
            return Err(LossError::IncompatibleTargets {
                loss: loss_type.name(),
                targets: targets.kind(),
            })
        }
    };

    let regularization_loss = network.regularization_loss();
    let accuracy = accuracy(&predictions, targets);

    let grads = network.backward(&dvalues, fused);
    for (layer, layer_grads) in network.layers.iter_mut().zip(grads.iter()) {
        optimizer.step(layer, layer_grads);
    }

    Ok(StepStats { data_loss, regularization_loss, accuracy })
}

/// Fraction of correct predictions: arg-max match for class targets, 0.5
/// threshold per output for binary targets.
pub fn accuracy(predictions: &Matrix, targets: &Targets) -> f64 {
    if predictions.rows == 0 {
        return 0.0;
    }
    match targets {
        Targets::Classes(labels) => {
            let truth = match labels {
                Labels::Sparse(indices) => indices.clone(),
                Labels::OneHot(matrix) => matrix.argmax_rows(),
            };
            let correct = predictions.argmax_rows().iter()
                .zip(truth.iter())
                .filter(|(p, t)| p == t)
                .count();
            correct as f64 / predictions.rows as f64
        }
        Targets::Binary(expected) => {
            let total = predictions.rows * predictions.cols;
            if total == 0 {
                return 0.0;
            }
            let correct = predictions.data.iter().flatten()
                .zip(expected.data.iter().flatten())
                .filter(|(p, y)| (**p > 0.5) == (**y > 0.5))
                .count();
            correct as f64 / total as f64
        }
    }
}
