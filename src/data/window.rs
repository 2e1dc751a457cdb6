use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Linear rescaling of a series onto [0, 1] using its observed bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    pub fn fit(values: &[f64]) -> ForecastResult<Self> {
        if values.is_empty() {
            return Err(ForecastError::Data("cannot fit scaler on an empty series".to_string()));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::Data(format!(
                "series contains a non-finite value at index {}",
                i
            )));
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self { min, max })
    }

    /// A flat series has no range; it is treated as 1 so every value maps to 0
    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 {
            range
        } else {
            1.0
        }
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        let range = self.range();
        values.iter().map(|v| (v - self.min) / range).collect()
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        let range = self.range();
        scaled.iter().map(|v| v * range + self.min).collect()
    }
}

/// Lookback windows and their next-step targets, in time order
#[derive(Debug, Clone)]
pub struct WindowedDataset {
    /// One row per sample, `lookback` columns
    pub inputs: Array2<f64>,
    pub targets: Array1<f64>,
}

impl WindowedDataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn lookback(&self) -> usize {
        self.inputs.ncols()
    }

    /// Split by index: the first `floor(ratio * len)` samples train, the rest test
    pub fn split(&self, train_ratio: f64) -> (WindowedDataset, WindowedDataset) {
        let split_idx = ((train_ratio * self.len() as f64).floor() as usize).min(self.len());

        let train = WindowedDataset {
            inputs: self.inputs.slice(s![..split_idx, ..]).to_owned(),
            targets: self.targets.slice(s![..split_idx]).to_owned(),
        };
        let test = WindowedDataset {
            inputs: self.inputs.slice(s![split_idx.., ..]).to_owned(),
            targets: self.targets.slice(s![split_idx..]).to_owned(),
        };
        (train, test)
    }
}

/// Slice `series` into windows: for every `i` in `lookback..len`, the input is
/// `series[i - lookback..i]` and the target is `series[i]`.
pub fn make_windows(series: &[f64], lookback: usize) -> WindowedDataset {
    let n = series.len().saturating_sub(lookback);
    let mut inputs = Array2::<f64>::zeros((n, lookback));
    let mut targets = Array1::<f64>::zeros(n);

    for (row, i) in (lookback..series.len()).enumerate() {
        inputs
            .row_mut(row)
            .assign(&Array1::from(series[i - lookback..i].to_vec()));
        targets[row] = series[i];
    }

    WindowedDataset { inputs, targets }
}

/// Fit a scaler on the whole series, scale it and cut it into windows
pub fn prepare_windows(prices: &[f64], lookback: usize) -> ForecastResult<(WindowedDataset, MinMaxScaler)> {
    let scaler = MinMaxScaler::fit(prices)?;
    let scaled = scaler.transform(prices);
    Ok((make_windows(&scaled, lookback), scaler))
}
