use chrono::NaiveDate;
use serde::Serialize;

/// Fixed model and data settings of the forecasting job.
/// Only `epochs` and `batchSize` are configurable per run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastProfile {
    pub lookback_window: usize,
    pub train_ratio: f64,
    pub hidden_units: usize,
    pub num_layers: usize,
    pub dropout: f64,
    pub learning_rate: f64,
    pub seed: u64,
    pub series: SeriesSpec,
}

/// Parameters of the synthetic geometric Brownian motion path
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSpec {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub initial_price: f64,
    pub drift: f64,
    pub volatility: f64,
    pub seed: u64,
}

impl Default for SeriesSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            initial_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
            seed: 42,
        }
    }
}

impl Default for ForecastProfile {
    fn default() -> Self {
        Self {
            lookback_window: 60,
            train_ratio: 0.8,
            hidden_units: 50,
            num_layers: 3,
            dropout: 0.2,
            learning_rate: 0.001,
            seed: 42,
            series: SeriesSpec::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = ForecastProfile::default();
        assert_eq!(profile.lookback_window, 60);
        assert_eq!(profile.hidden_units, 50);
        assert_eq!(profile.num_layers, 3);
        assert_eq!(profile.dropout, 0.2);
        assert_eq!(profile.learning_rate, 0.001);
        assert_eq!(profile.seed, 42);
    }

    #[test]
    fn test_default_series_spans_four_years() {
        let spec = SeriesSpec::default();
        assert_eq!(spec.start.to_string(), "2020-01-01");
        assert_eq!(spec.end.to_string(), "2024-01-01");
        // 2020 is a leap year, end date inclusive
        assert_eq!((spec.end - spec.start).num_days() + 1, 1462);
    }

    #[test]
    fn test_profile_serializes_for_logging() {
        let value = serde_json::to_value(ForecastProfile::default()).unwrap();
        assert_eq!(value["lookback_window"], 60);
        assert_eq!(value["series"]["start"], "2020-01-01");
        assert_eq!(value["series"]["volatility"], 0.02);
    }
}
