use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use super::batcher::{sequential_batches, WindowBatch};
use super::model::LstmForecaster;
use super::tracker::{EpochMetrics, TrainingHistory};
use crate::data::WindowedDataset;
use crate::error::{ForecastError, ForecastResult};

/// Optimisation settings of a fit
#[derive(Debug, Clone)]
pub struct TrainerSettings {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Seeds the per-epoch shuffle of training batches
    pub seed: u64,
}

/// Fit `model` on `train` with Adam on MSE, validating on `valid` after every
/// epoch. Every configured epoch runs; there is no early stopping.
///
/// Returns the trained network on the inner (non-autodiff) backend together
/// with the loss history.
pub fn fit<B: AutodiffBackend>(
    model: LstmForecaster<B>,
    train: &WindowedDataset,
    valid: &WindowedDataset,
    settings: &TrainerSettings,
    device: &B::Device,
) -> ForecastResult<(LstmForecaster<B::InnerBackend>, TrainingHistory)> {
    if settings.batch_size == 0 {
        return Err(ForecastError::Training("batch size must be > 0".to_string()));
    }
    if train.is_empty() {
        return Err(ForecastError::Training("no training samples".to_string()));
    }
    if valid.is_empty() {
        return Err(ForecastError::Training("no validation samples".to_string()));
    }

    let mut model = model;
    let mut optim = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-7)
        .init::<B, LstmForecaster<B>>();
    let loss_fn = MseLoss::new();
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut order: Vec<usize> = (0..train.len()).collect();
    let mut history = TrainingHistory::new();

    for epoch in 1..=settings.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0;
        let mut mae_sum = 0.0;
        for chunk in order.chunks(settings.batch_size) {
            let batch = WindowBatch::<B>::from_indices(train, chunk, device);
            let output = model.forward(batch.inputs);

            let mae = (output.clone() - batch.targets.clone()).abs().mean();
            let loss = loss_fn.forward(output, batch.targets, Reduction::Mean);

            let weight = chunk.len() as f64;
            loss_sum += scalar(loss.clone()) * weight;
            mae_sum += scalar(mae) * weight;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(settings.learning_rate, model, grads);
        }

        let (val_loss, val_mae) = evaluate_loss(&model.valid(), valid, settings.batch_size, device)?;
        let metrics = EpochMetrics {
            epoch,
            train_loss: loss_sum / train.len() as f64,
            train_mae: mae_sum / train.len() as f64,
            val_loss,
            val_mae,
        };
        if !metrics.train_loss.is_finite() {
            return Err(ForecastError::Training(format!("loss diverged at epoch {}", epoch)));
        }
        history.record_epoch(metrics);

        if epoch % 10 == 0 || epoch == settings.epochs {
            info!(
                "  Epoch {}/{}: loss={:.6} val_loss={:.6}",
                epoch, settings.epochs, metrics.train_loss, metrics.val_loss
            );
        }
    }

    let trained = model.valid();
    if history.epochs_completed() == 0 {
        let (train_loss, _) = evaluate_loss(&trained, train, settings.batch_size, device)?;
        let (val_loss, _) = evaluate_loss(&trained, valid, settings.batch_size, device)?;
        info!("  No epochs configured, untrained loss={:.6} val_loss={:.6}", train_loss, val_loss);
        history.set_baseline(train_loss, val_loss);
    }

    Ok((trained, history))
}

/// Sample-weighted (MSE, MAE) of `model` over `dataset`
pub fn evaluate_loss<B: Backend>(
    model: &LstmForecaster<B>,
    dataset: &WindowedDataset,
    batch_size: usize,
    device: &B::Device,
) -> ForecastResult<(f64, f64)> {
    if dataset.is_empty() {
        return Err(ForecastError::Training("cannot evaluate an empty dataset".to_string()));
    }

    let predictions = predict(model, dataset, batch_size, device)?;
    let diff = &dataset.targets - &predictions;
    let mse = diff.mapv(|d| d * d).mean().unwrap_or(0.0);
    let mae = diff.mapv(f64::abs).mean().unwrap_or(0.0);
    Ok((mse, mae))
}

/// Point predictions for every window of `dataset`, in order
pub fn predict<B: Backend>(
    model: &LstmForecaster<B>,
    dataset: &WindowedDataset,
    batch_size: usize,
    device: &B::Device,
) -> ForecastResult<Array1<f64>> {
    let mut predictions = Vec::with_capacity(dataset.len());

    for indices in sequential_batches(dataset.len(), batch_size) {
        let batch = WindowBatch::<B>::from_indices(dataset, &indices, device);
        let output = model.forward(batch.inputs);
        let values = output
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ForecastError::Training(format!("cannot read predictions: {:?}", e)))?;
        predictions.extend(values.into_iter().map(f64::from));
    }

    Ok(Array1::from(predictions))
}

fn scalar<B: Backend>(tensor: Tensor<B, 1>) -> f64 {
    tensor.into_scalar().elem::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::window::make_windows;
    use crate::ml::model::LstmForecasterConfig;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray<f32>>;

    fn sine_dataset(n: usize, lookback: usize) -> WindowedDataset {
        let series: Vec<f64> = (0..n).map(|i| 0.5 + 0.4 * (i as f64 * 0.2).sin()).collect();
        make_windows(&series, lookback)
    }

    fn small_model(device: &<TestBackend as Backend>::Device) -> LstmForecaster<TestBackend> {
        LstmForecasterConfig::new()
            .with_hidden_size(8)
            .with_num_layers(2)
            .init::<TestBackend>(device)
    }

    fn settings(epochs: usize) -> TrainerSettings {
        TrainerSettings { epochs, batch_size: 16, learning_rate: 0.01, seed: 42 }
    }

    #[test]
    fn test_fit_records_every_epoch() {
        let device = Default::default();
        let (train, valid) = sine_dataset(120, 10).split(0.8);

        let (_, history) = fit(small_model(&device), &train, &valid, &settings(3), &device).unwrap();
        assert_eq!(history.epochs_completed(), 3);
        for (i, m) in history.epochs().iter().enumerate() {
            assert_eq!(m.epoch, i + 1);
            assert!(m.train_loss.is_finite() && m.train_loss >= 0.0);
            assert!(m.val_loss.is_finite() && m.val_loss >= 0.0);
        }
    }

    #[test]
    fn test_training_reduces_loss() {
        let device = Default::default();
        let (train, valid) = sine_dataset(200, 10).split(0.8);

        let (_, history) = fit(small_model(&device), &train, &valid, &settings(15), &device).unwrap();
        let losses = history.train_losses();
        assert!(losses[losses.len() - 1] < losses[0]);
    }

    #[test]
    fn test_zero_epochs_uses_untrained_loss() {
        let device = Default::default();
        let (train, valid) = sine_dataset(80, 10).split(0.8);

        let (_, history) = fit(small_model(&device), &train, &valid, &settings(0), &device).unwrap();
        assert_eq!(history.epochs_completed(), 0);
        assert!(history.final_train_loss().unwrap().is_finite());
        assert!(history.final_val_loss().unwrap().is_finite());
    }

    #[test]
    fn test_rejects_zero_batch_size_and_empty_splits() {
        let device = Default::default();
        let (train, valid) = sine_dataset(80, 10).split(0.8);

        let bad = TrainerSettings { batch_size: 0, ..settings(1) };
        let err = fit(small_model(&device), &train, &valid, &bad, &device).unwrap_err();
        assert_eq!(err.kind(), "training");

        let (empty, _) = sine_dataset(80, 10).split(0.0);
        assert!(fit(small_model(&device), &empty, &valid, &settings(1), &device).is_err());
    }

    #[test]
    fn test_predict_returns_one_value_per_window() {
        let device = Default::default();
        let dataset = sine_dataset(50, 10);
        let model = small_model(&device).valid();

        let predictions = predict(&model, &dataset, 7, &device).unwrap();
        assert_eq!(predictions.len(), dataset.len());
        assert!(predictions.iter().all(|p| p.is_finite()));
    }
}
