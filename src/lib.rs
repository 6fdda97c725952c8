pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::{ActivationFunction, Softmax};
pub use layers::dense::Layer;
pub use network::network::Network;
pub use loss::{
    BinaryCrossEntropyLoss, CategoricalCrossEntropyLoss, Labels, Loss, LossError, LossType,
    Regularized, Regularizer, SoftmaxCrossEntropyLoss, regularization_loss,
};
pub use optim::sgd::Sgd;
pub use train::{train_loop, TrainConfig, Targets};
