use ferrite_loss::{ActivationFunction, LossType, Matrix, Network, Targets, TrainConfig, train_loop};

fn main() {
    env_logger::init();

    let mut network = Network::new(vec![
        (4, 2, ActivationFunction::Tanh),
        (1, 4, ActivationFunction::Sigmoid),
    ]);

    let inputs = Matrix::from_data(vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ]);
    let expected = Matrix::from_data(vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ]);

    let mut config = TrainConfig::new(5000, 0.5, LossType::BinaryCrossEntropy);
    config.log_every = 1000;

    let history = match train_loop(&mut network, &inputs, &Targets::Binary(expected), &config) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("training failed: {e}");
            std::process::exit(1);
        }
    };
    if let Some(last) = history.last() {
        println!("Epoch {}: loss = {:.6}", last.epoch, last.data_loss);
    }

    let outputs = network.forward(&inputs);
    for (input, output) in inputs.data.iter().zip(outputs.data.iter()) {
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }
}
