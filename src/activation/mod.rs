pub mod activation;
pub mod softmax;

pub use activation::ActivationFunction;
pub use softmax::Softmax;
