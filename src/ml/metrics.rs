use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Regression metrics on the held-out split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl EvaluationMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> ForecastResult<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ForecastError::Data(format!(
                "prediction count {} does not match target count {}",
                y_pred.len(),
                y_true.len()
            )));
        }
        if y_true.is_empty() {
            return Err(ForecastError::Data("no samples to evaluate".to_string()));
        }

        Ok(Self {
            mse: mean_squared_error(y_true, y_pred),
            mae: mean_absolute_error(y_true, y_pred),
            r2: r2_score(y_true, y_pred),
        })
    }
}

pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let diff = y_true - y_pred;
    diff.mapv(|d| d * d).mean().unwrap_or(0.0)
}

pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let diff = y_true - y_pred;
    diff.mapv(f64::abs).mean().unwrap_or(0.0)
}

/// Coefficient of determination. A constant target gives 1.0 for a perfect
/// fit and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_res: f64 = (y_true - y_pred).mapv(|d| d * d).sum();
    let ss_tot: f64 = y_true.mapv(|y| (y - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction() {
        let y = array![0.1, 0.4, 0.35, 0.8];
        let metrics = EvaluationMetrics::compute(&y, &y).unwrap();
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        assert!((mean_squared_error(&y_true, &y_pred) - 0.375).abs() < 1e-12);
        assert!((mean_absolute_error(&y_true, &y_pred) - 0.5).abs() < 1e-12);
        assert!((r2_score(&y_true, &y_pred) - 0.948_608_137_044_967_9).abs() < 1e-12);
    }

    #[test]
    fn test_mean_predictor_scores_zero() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        assert!(r2_score(&y_true, &y_pred).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let y_true = array![0.5, 0.5];
        assert_eq!(r2_score(&y_true, &array![0.5, 0.5]), 1.0);
        assert_eq!(r2_score(&y_true, &array![0.4, 0.6]), 0.0);
    }

    #[test]
    fn test_length_mismatch_and_empty() {
        let err = EvaluationMetrics::compute(&array![1.0, 2.0], &array![1.0]).unwrap_err();
        assert_eq!(err.kind(), "data");
        assert!(EvaluationMetrics::compute(&Array1::zeros(0), &Array1::zeros(0)).is_err());
    }
}
