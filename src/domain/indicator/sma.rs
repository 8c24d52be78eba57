//! Simple Moving Average and the generic rolling mean.
//!
//! SMA(n)[i] = mean of the trailing n prices, maintained with a running sum.
//! Warmup: first (n-1) values are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(prices: &[f64], period: usize) -> IndicatorSeries {
    let mut values = vec![None; prices.len()];
    if period == 0 {
        return IndicatorSeries::new(IndicatorType::Sma(period), values);
    }

    let mut sum = 0.0;
    for (i, &price) in prices.iter().enumerate() {
        sum += price;
        if i >= period {
            sum -= prices[i - period];
        }
        if i + 1 >= period {
            values[i] = Some(sum / period as f64);
        }
    }

    IndicatorSeries::new(IndicatorType::Sma(period), values)
}

/// Rolling mean over a derived series. A window containing any `None` is `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    for i in (window.saturating_sub(1))..values.len() {
        let slice = &values[i + 1 - window..=i];
        out[i] = slice
            .iter()
            .copied()
            .sum::<Option<f64>>()
            .map(|s| s / window as f64);
    }
    out
}
