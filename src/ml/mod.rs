pub mod batcher;
pub mod metrics;
pub mod model;
pub mod persistence;
pub mod tracker;
pub mod trainer;

pub use metrics::EvaluationMetrics;
pub use model::LstmForecasterConfig;
pub use persistence::ArtifactPaths;
pub use tracker::TrainingHistory;
pub use trainer::TrainerSettings;
