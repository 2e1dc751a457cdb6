use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ForecastError, ForecastResult};

/// Per-run options read from the JSON file written by the training service.
///
/// The service also writes `modelType`, `dataSource`, `parameters` and
/// `validationSplit`; those are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_epochs() -> usize {
    50
}

fn default_batch_size() -> usize {
    32
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            batch_size: default_batch_size(),
        }
    }
}

impl RunConfig {
    /// Read and parse the config file at `path`
    pub fn load(path: impl AsRef<Path>) -> ForecastResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw).map_err(|e| match e {
            ForecastError::Config(msg) => {
                ForecastError::Config(format!("invalid config {}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Only a JSON object is a config; arrays and scalars are rejected
    pub fn from_json(json: &str) -> ForecastResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ForecastError::Config(e.to_string()))?;
        if !value.is_object() {
            return Err(ForecastError::Config(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| ForecastError::Config(e.to_string()))
    }

    /// Constraints the training backend would otherwise reject at fit time
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.batch_size == 0 {
            errors.push("batchSize must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_keys_missing() {
        let config = RunConfig::from_json("{}").unwrap();
        assert_eq!(config.epochs, 50);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_explicit_values_override() {
        let config = RunConfig::from_json(r#"{"epochs": 5, "batchSize": 8}"#).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.batch_size, 8);
    }

    #[test]
    fn test_service_keys_are_ignored() {
        let json = r#"{
            "modelType": "lstm",
            "dataSource": "synthetic",
            "parameters": {"units": 50},
            "validationSplit": 0.3,
            "epochs": 3
        }"#;
        let config = RunConfig::from_json(json).unwrap();
        assert_eq!(config.epochs, 3);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_rejects_non_object_and_negative_values() {
        assert!(RunConfig::from_json("[1, 2]").is_err());
        assert!(RunConfig::from_json(r#"{"epochs": -1}"#).is_err());
        assert!(RunConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_array_and_scalar_configs_are_config_errors() {
        for json in ["[1, 2]", "[]", "42", "\"epochs\"", "null"] {
            let err = RunConfig::from_json(json).unwrap_err();
            assert_eq!(err.kind(), "config", "{json} should be rejected");
        }
        let err = RunConfig::from_json("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_load_array_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[5, 16]").unwrap();
        let err = RunConfig::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_validate_batch_size() {
        let config = RunConfig { epochs: 1, batch_size: 0 };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["batchSize must be > 0".to_string()]);
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batchSize": 16}}"#).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.epochs, 50);
        assert_eq!(config.batch_size, 16);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
