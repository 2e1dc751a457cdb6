use serde::{Deserialize, Serialize};
use tracing::debug;

/// Losses recorded at the end of one epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f64,
    pub train_mae: f64,
    pub val_loss: f64,
    pub val_mae: f64,
}

/// Per-epoch loss history of a training run.
///
/// When no epoch ran, the losses of the untrained network are kept as a
/// baseline so the final values are always defined.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    epochs: Vec<EpochMetrics>,
    baseline: Option<(f64, f64)>, // (train_loss, val_loss)
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_epoch(&mut self, metrics: EpochMetrics) {
        debug!(
            "Epoch {}: loss={:.6} mae={:.6} val_loss={:.6} val_mae={:.6}",
            metrics.epoch, metrics.train_loss, metrics.train_mae, metrics.val_loss, metrics.val_mae
        );
        self.epochs.push(metrics);
    }

    pub fn set_baseline(&mut self, train_loss: f64, val_loss: f64) {
        self.baseline = Some((train_loss, val_loss));
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    pub fn epochs_completed(&self) -> usize {
        self.epochs.len()
    }

    pub fn final_train_loss(&self) -> Option<f64> {
        self.epochs
            .last()
            .map(|m| m.train_loss)
            .or(self.baseline.map(|(train, _)| train))
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.epochs
            .last()
            .map(|m| m.val_loss)
            .or(self.baseline.map(|(_, val)| val))
    }

    pub fn train_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.train_loss).collect()
    }

    pub fn val_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.val_loss).collect()
    }
}
