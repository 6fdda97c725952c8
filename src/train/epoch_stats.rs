use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean loss over the batch, excluding regularization.
    pub data_loss: f64,
    /// Sum of the per-layer regularization losses.
    pub regularization_loss: f64,
    /// Fraction of samples predicted correctly, in [0, 1].
    pub accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Data loss plus regularization loss; the quantity being minimized.
    pub fn total_loss(&self) -> f64 {
        self.data_loss + self.regularization_loss
    }
}
