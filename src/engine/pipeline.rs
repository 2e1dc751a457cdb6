use burn::backend::{Autodiff, NdArray};
use burn::tensor::backend::Backend;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use super::results::ResultRecord;
use crate::config::{ForecastProfile, RunConfig};
use crate::data::{generate_synthetic_series, prepare_windows};
use crate::error::{ForecastError, ForecastResult};
use crate::ml::persistence::save_model;
use crate::ml::trainer::{fit, predict};
use crate::ml::{ArtifactPaths, EvaluationMetrics, LstmForecasterConfig, TrainerSettings, TrainingHistory};

/// CPU tensor backend with automatic differentiation
pub type TrainBackend = Autodiff<NdArray<f32>>;

/// Steps of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validate,
    Generate,
    Prepare,
    Build,
    Train,
    Evaluate,
    Save,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 7] = [
        PipelineStage::Validate,
        PipelineStage::Generate,
        PipelineStage::Prepare,
        PipelineStage::Build,
        PipelineStage::Train,
        PipelineStage::Evaluate,
        PipelineStage::Save,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PipelineStage::Validate => "Validate run options",
            PipelineStage::Generate => "Generate synthetic series",
            PipelineStage::Prepare => "Scale and window series",
            PipelineStage::Build => "Build LSTM network",
            PipelineStage::Train => "Train",
            PipelineStage::Evaluate => "Evaluate on test split",
            PipelineStage::Save => "Save model and results",
        }
    }

    pub fn number(&self) -> usize {
        *self as usize + 1
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a successful run produced
#[derive(Debug)]
pub struct TrainingOutcome {
    pub record: ResultRecord,
    pub history: TrainingHistory,
    pub result_path: PathBuf,
}

/// Generate → prepare → train → evaluate → save, for one session
pub struct ForecastPipeline {
    profile: ForecastProfile,
    paths: ArtifactPaths,
}

impl ForecastPipeline {
    pub fn new(profile: ForecastProfile, paths: ArtifactPaths) -> Self {
        Self { profile, paths }
    }

    fn enter(&self, stage: PipelineStage) {
        info!("━━━ Step {}/{}: {} ━━━", stage.number(), PipelineStage::ALL.len(), stage);
    }

    pub fn run(&self, config: &RunConfig) -> ForecastResult<TrainingOutcome> {
        let profile = &self.profile;
        let started = Instant::now();

        self.enter(PipelineStage::Validate);
        config
            .validate()
            .map_err(|errors| ForecastError::Training(errors.join(", ")))?;
        info!("Session: {}", self.paths.session_id());
        info!("Epochs: {}, batch size: {}", config.epochs, config.batch_size);
        match serde_json::to_string(profile) {
            Ok(json) => debug!("Profile: {}", json),
            Err(e) => debug!("Profile not serializable: {}", e),
        }

        self.enter(PipelineStage::Generate);
        let series = generate_synthetic_series(&profile.series)?;
        info!("✓ Generated {} daily prices", series.len());

        self.enter(PipelineStage::Prepare);
        let (dataset, scaler) = prepare_windows(&series.prices, profile.lookback_window)?;
        if dataset.is_empty() {
            return Err(ForecastError::Data(format!(
                "series of {} points is too short for a lookback window of {}",
                series.len(),
                profile.lookback_window
            )));
        }
        debug!("Scaler bounds: min={:.4} max={:.4}", scaler.min, scaler.max);

        let (train, test) = dataset.split(profile.train_ratio);
        if train.is_empty() || test.is_empty() {
            return Err(ForecastError::Data(format!(
                "{} windows cannot be split into non-empty train and test sets",
                dataset.len()
            )));
        }
        info!("✓ {} windows: {} train / {} test", dataset.len(), train.len(), test.len());

        self.enter(PipelineStage::Build);
        let device = <TrainBackend as Backend>::Device::default();
        let model = LstmForecasterConfig::new()
            .with_hidden_size(profile.hidden_units)
            .with_num_layers(profile.num_layers)
            .with_dropout(profile.dropout)
            .init::<TrainBackend>(&device);
        info!(
            "✓ {} LSTM layers x {} units, dropout {}",
            model.num_layers(),
            profile.hidden_units,
            profile.dropout
        );

        self.enter(PipelineStage::Train);
        let settings = TrainerSettings {
            epochs: config.epochs,
            batch_size: config.batch_size,
            learning_rate: profile.learning_rate,
            seed: profile.seed,
        };
        let train_start = Instant::now();
        let (trained, history) = fit(model, &train, &test, &settings, &device)?;
        info!("✓ Training complete in {:.1}s", train_start.elapsed().as_secs_f64());
        debug!("Train loss curve: {:?}", history.train_losses());
        debug!("Validation loss curve: {:?}", history.val_losses());

        let final_train_loss = history
            .final_train_loss()
            .ok_or_else(|| ForecastError::Training("no training loss recorded".to_string()))?;
        let final_val_loss = history
            .final_val_loss()
            .ok_or_else(|| ForecastError::Training("no validation loss recorded".to_string()))?;

        self.enter(PipelineStage::Evaluate);
        let predictions = predict(&trained, &test, config.batch_size, &device)?;
        let metrics = EvaluationMetrics::compute(&test.targets, &predictions)?;
        info!("✓ R²={:.4} MSE={:.6} MAE={:.6}", metrics.r2, metrics.mse, metrics.mae);

        self.enter(PipelineStage::Save);
        self.paths.check_output_dir()?;
        let model_path = self.paths.model_path();
        save_model(trained, &model_path)?;

        let record = ResultRecord {
            accuracy: metrics.r2,
            loss: metrics.mse,
            mae: metrics.mae,
            model_path: model_path.to_string_lossy().to_string(),
            training_samples: train.len(),
            test_samples: test.len(),
            epochs: config.epochs,
            final_train_loss,
            final_val_loss,
        };
        let result_path = self.paths.result_path();
        record.write_to(&result_path)?;

        record.log_summary();
        info!(
            "Run finished in {:.1}s, outputs in {}",
            started.elapsed().as_secs_f64(),
            self.paths.output_dir().display()
        );

        Ok(TrainingOutcome {
            record,
            history,
            result_path,
        })
    }
}
