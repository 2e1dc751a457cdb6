use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::config::SeriesSpec;
use crate::error::{ForecastError, ForecastResult};

/// Daily price path
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }
}

/// Generate a geometric Brownian motion path, one point per calendar day
/// from `spec.start` to `spec.end` inclusive.
///
/// The generator is seeded from `spec.seed` and owned by this call, so the
/// same spec always yields the same series.
pub fn generate_synthetic_series(spec: &SeriesSpec) -> ForecastResult<PriceSeries> {
    if spec.end < spec.start {
        return Err(ForecastError::Data(format!(
            "series end {} is before start {}",
            spec.end, spec.start
        )));
    }

    if !spec.drift.is_finite() || !spec.volatility.is_finite() || spec.volatility < 0.0 {
        return Err(ForecastError::Data(format!(
            "invalid return distribution: drift={} volatility={}",
            spec.drift, spec.volatility
        )));
    }
    if !spec.initial_price.is_finite() || spec.initial_price <= 0.0 {
        return Err(ForecastError::Data(format!(
            "initial price must be positive, got {}",
            spec.initial_price
        )));
    }

    let dates: Vec<NaiveDate> = spec
        .start
        .iter_days()
        .take_while(|d| *d <= spec.end)
        .collect();

    let step = Normal::new(spec.drift, spec.volatility)
        .map_err(|e| ForecastError::Data(format!("invalid return distribution: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let mut prices = Vec::with_capacity(dates.len());
    let mut price = spec.initial_price;
    prices.push(price);
    for _ in 1..dates.len() {
        price *= step.sample(&mut rng).exp();
        prices.push(price);
    }

    debug!(
        "Generated {} daily prices ({} to {}), last={:.4}",
        prices.len(),
        spec.start,
        spec.end,
        price
    );

    Ok(PriceSeries { dates, prices })
}
