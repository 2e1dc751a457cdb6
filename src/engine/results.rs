use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{ForecastError, ForecastResult};

/// Summary written to `result_<session>.json` and read back by the training service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// R² on the test split
    pub accuracy: f64,
    /// MSE on the test split
    pub loss: f64,
    pub mae: f64,
    pub model_path: String,
    pub training_samples: usize,
    pub test_samples: usize,
    pub epochs: usize,
    pub final_train_loss: f64,
    pub final_val_loss: f64,
}

impl ResultRecord {
    pub fn to_json(&self) -> ForecastResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::Io(format!("cannot serialize result: {}", e)))
    }

    pub fn write_to(&self, path: &Path) -> ForecastResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| ForecastError::io(&format!("writing {}", path.display()), e))?;
        info!("Saved results to {}", path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> ForecastResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::io(&format!("reading {}", path.display()), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| ForecastError::Io(format!("invalid result file {}: {}", path.display(), e)))
    }

    /// Pretty print to the log
    pub fn log_summary(&self) {
        info!("{}", "=".repeat(50));
        info!("                TRAINING RESULTS");
        info!("{}", "=".repeat(50));
        info!("R² (accuracy):      {:.4}", self.accuracy);
        info!("MSE (loss):         {:.6}", self.loss);
        info!("MAE:                {:.6}", self.mae);
        info!("Final train loss:   {:.6}", self.final_train_loss);
        info!("Final val loss:     {:.6}", self.final_val_loss);
        info!("Samples:            {} train / {} test", self.training_samples, self.test_samples);
        info!("Epochs:             {}", self.epochs);
        info!("Model:              {}", self.model_path);
        info!("{}", "=".repeat(50));
    }
}
