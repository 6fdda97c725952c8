use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::loss::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{train_step, Targets};

/// Trains `network` for `config.epochs` full-batch epochs and returns the
/// statistics of every completed epoch.
///
/// Hidden layers pick up `config.hidden_regularizer` before the first epoch.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// Propagates the first `LossError` (shape mismatch, bad labels, or targets
/// that do not fit `config.loss_type`).
pub fn train_loop(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Targets,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    let optimizer = Sgd::new(config.learning_rate);
    network.set_hidden_regularizer(config.hidden_regularizer);

    log::info!(
        "training {} layers for {} epochs ({}, lr = {})",
        network.layers.len(),
        config.epochs,
        config.loss_type.name(),
        config.learning_rate
    );

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            log::info!("stop requested before epoch {}", epoch);
            break;
        }

        let t_start = Instant::now();
        let step = train_step(network, inputs, targets, config.loss_type, &optimizer)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            data_loss: step.data_loss,
            regularization_loss: step.regularization_loss,
            accuracy: step.accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if !stats.total_loss().is_finite() {
            log::warn!("epoch {}: loss is not finite ({})", epoch, stats.total_loss());
        }
        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch == 1) {
            log::info!(
                "epoch {:>5}: acc {:.3}, loss {:.4} (data {:.4}, reg {:.4})",
                epoch,
                stats.accuracy,
                stats.total_loss(),
                stats.data_loss,
                stats.regularization_loss
            );
        }

        history.push(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                log::debug!("progress receiver dropped after epoch {}", epoch);
                break;
            }
        }
    }

    Ok(history)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
