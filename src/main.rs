use rand::Rng;

use ferrite_loss::{
    ActivationFunction, Labels, LossType, Matrix, Network, Regularizer, Targets, TrainConfig,
    train_loop,
};

/// Spiral dataset: `classes` interleaved arms of `points` noisy samples each.
fn spiral_data(points: usize, classes: usize) -> (Matrix, Vec<usize>) {
    let mut rng = rand::thread_rng();
    let mut rows = Vec::with_capacity(points * classes);
    let mut labels = Vec::with_capacity(points * classes);
    for class in 0..classes {
        for i in 0..points {
            let r = i as f64 / points as f64;
            let t = class as f64 * 4.0 + r * 4.0 + rng.gen_range(-0.2..0.2);
            rows.push(vec![r * (t * 2.5).sin(), r * (t * 2.5).cos()]);
            labels.push(class);
        }
    }
    (Matrix::from_data(rows), labels)
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match TrainConfig::load_json(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("cannot read config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => TrainConfig {
            epochs: 10_001,
            learning_rate: 1.0,
            loss_type: LossType::SoftmaxCrossEntropy,
            hidden_regularizer: Regularizer::l2(5e-4),
            log_every: 1000,
            ..TrainConfig::default()
        },
    };

    if config.loss_type == LossType::BinaryCrossEntropy {
        log::error!("the spiral demo is a multi-class problem; run `cargo run --example xor_bce` for binary cross-entropy");
        std::process::exit(1);
    }

    let (inputs, labels) = spiral_data(100, 3);
    let mut network = Network::new(vec![
        (64, 2, ActivationFunction::ReLU),
        (3, 64, config.loss_type.output_activation()),
    ]);

    match train_loop(&mut network, &inputs, &Targets::Classes(Labels::Sparse(labels)), &config) {
        Ok(history) => {
            if let Some(last) = history.last() {
                println!(
                    "epoch {}: acc {:.3}, data loss {:.4}, reg loss {:.4}",
                    last.epoch, last.accuracy, last.data_loss, last.regularization_loss
                );
            }
        }
        Err(e) => {
            log::error!("training failed: {}", e);
            std::process::exit(1);
        }
    }
}
