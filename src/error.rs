use thiserror::Error;

/// Failure of a training run, tagged by the stage family that produced it
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("config error: {0}")]
    Config(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("io error: {0}")]
    Io(String),
}

impl ForecastError {
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Config(_) => "config",
            ForecastError::Data(_) => "data",
            ForecastError::Training(_) => "training",
            ForecastError::Io(_) => "io",
        }
    }

    pub fn io(context: &str, err: std::io::Error) -> Self {
        ForecastError::Io(format!("{}: {}", context, err))
    }
}

pub type ForecastResult<T> = std::result::Result<T, ForecastError>;
