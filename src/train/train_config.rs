use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::loss::loss_type::LossType;
use crate::loss::regularization::Regularizer;
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`             — number of full-batch passes over the training data
/// - `learning_rate`      — SGD step size
/// - `loss_type`          — which loss the loop optimizes
/// - `hidden_regularizer` — L1/L2 coefficients applied to every hidden layer
/// - `log_every`          — log progress every n epochs (0 disables)
/// - `progress_tx`        — optional channel sender; one `EpochStats` is sent per
///                          completed epoch.  If the receiver is dropped the loop
///                          terminates early.
/// - `stop_flag`          — optional atomic flag; when set to `true` from another
///                          thread the loop terminates after the current epoch.
///
/// Only the plain fields are (de)serialized; the channel and stop flag are
/// runtime-only.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub loss_type: LossType,
    pub hidden_regularizer: Regularizer,
    pub log_every: usize,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            learning_rate: 1.0,
            loss_type: LossType::default(),
            hidden_regularizer: Regularizer::default(),
            log_every: 100,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(epochs: usize, learning_rate: f64, loss_type: LossType) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            loss_type,
            ..TrainConfig::default()
        }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `TrainConfig` from a JSON file. Missing fields take
    /// their defaults.
    pub fn load_json(path: &str) -> std::io::Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
