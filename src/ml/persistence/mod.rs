use burn::module::Module;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::Backend;
use std::path::{Path, PathBuf};
use tracing::info;

use super::model::LstmForecaster;
use crate::error::{ForecastError, ForecastResult};

/// Extension the model recorder writes
pub const MODEL_EXTENSION: &str = "mpk";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Session-scoped output file locations
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    output_dir: PathBuf,
    session_id: String,
}

impl ArtifactPaths {
    pub fn new(output_dir: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            session_id: session_id.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// `<dir>/lstm_model_<session>.mpk`
    pub fn model_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("lstm_model_{}.{}", self.session_id, MODEL_EXTENSION))
    }

    /// `<dir>/result_<session>.json`
    pub fn result_path(&self) -> PathBuf {
        self.output_dir.join(format!("result_{}.json", self.session_id))
    }

    /// The directory is expected to exist already; it is never created here
    pub fn check_output_dir(&self) -> ForecastResult<()> {
        if self.output_dir.is_dir() {
            Ok(())
        } else {
            Err(ForecastError::Io(format!(
                "output directory {} does not exist",
                self.output_dir.display()
            )))
        }
    }
}

/// Write the model weights to `path` (named MessagePack, full precision)
pub fn save_model<B: Backend>(model: LstmForecaster<B>, path: &Path) -> ForecastResult<()> {
    model
        .save_file(path.to_path_buf(), &ModelRecorder::new())
        .map_err(|e| ForecastError::Io(format!("cannot save model to {}: {:?}", path.display(), e)))?;
    info!("Saved model to {}", path.display());
    Ok(())
}
