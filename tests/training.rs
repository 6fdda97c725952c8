//! End-to-end: every loss drives a small network towards its targets.

use ferrite_loss::{
    ActivationFunction, Labels, LossType, Matrix, Network, Regularizer, Targets, TrainConfig,
    train_loop,
};

fn blobs() -> (Matrix, Labels) {
    let inputs = Matrix::from_data(vec![
        vec![1.0, 0.1],
        vec![0.9, -0.1],
        vec![-0.1, 1.0],
        vec![0.1, 0.9],
        vec![-1.0, -0.9],
        vec![-0.9, -1.1],
    ]);
    (inputs, Labels::Sparse(vec![0, 0, 1, 1, 2, 2]))
}

fn classifier(output: ActivationFunction) -> Network {
    Network::new(vec![
        (8, 2, ActivationFunction::Tanh),
        (3, 8, output),
    ])
}

#[test]
fn fused_softmax_loss_learns_blobs() {
    let (inputs, labels) = blobs();
    let mut network = classifier(ActivationFunction::Identity);
    let mut config = TrainConfig::new(300, 0.5, LossType::SoftmaxCrossEntropy);
    config.hidden_regularizer = Regularizer::l2(1e-4);
    let history = train_loop(&mut network, &inputs, &Targets::Classes(labels), &config).unwrap();

    let first = &history[0];
    let last = history.last().unwrap();
    assert!(last.data_loss < first.data_loss);
    assert!(last.data_loss < 0.3, "loss {}", last.data_loss);
    assert_eq!(last.accuracy, 1.0);
    assert!(last.regularization_loss > 0.0);
}

#[test]
fn unfused_categorical_loss_learns_blobs() {
    let (inputs, labels) = blobs();
    let one_hot = Labels::OneHot(labels.to_one_hot(3));
    let mut network = classifier(ActivationFunction::Softmax);
    let config = TrainConfig::new(300, 0.5, LossType::CategoricalCrossEntropy);
    let history = train_loop(&mut network, &inputs, &Targets::Classes(one_hot), &config).unwrap();

    let last = history.last().unwrap();
    assert!(last.data_loss < history[0].data_loss);
    assert_eq!(last.accuracy, 1.0);
}

#[test]
fn binary_loss_learns_or() {
    let inputs = Matrix::from_data(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]);
    let expected = Matrix::from_data(vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]]);
    let mut network = Network::new(vec![(1, 2, ActivationFunction::Sigmoid)]);
    let config = TrainConfig::new(2000, 1.0, LossType::BinaryCrossEntropy);
    let history = train_loop(&mut network, &inputs, &Targets::Binary(expected), &config).unwrap();

    let last = history.last().unwrap();
    assert!(last.data_loss < 0.2, "loss {}", last.data_loss);
    assert_eq!(last.accuracy, 1.0);
}
