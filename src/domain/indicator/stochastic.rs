//! Stochastic Oscillator over closing prices.
//!
//! raw %K[i] = (P[i] - min(window)) / (max(window) - min(window)) * 100
//! %K = rolling mean(raw %K, smooth_k)
//! %D = rolling mean(%K, smooth_d)
//!
//! A flat window (max == min) has no defined %K; the `None` then flows through
//! both smoothing stages.
//!
//! Default parameters: period=14, smooth_k=3, smooth_d=3
//! Warmup: %K defined from index period+smooth_k-2, %D one smoothing later.

use crate::domain::indicator::donchian::rolling_extrema;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, rolling_mean};

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_SMOOTH_K: usize = 3;
pub const DEFAULT_SMOOTH_D: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
}

pub fn calculate_stochastic(
    prices: &[f64],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> StochasticSeries {
    let raw_k: Vec<Option<f64>> = rolling_extrema(prices, period)
        .iter()
        .zip(prices)
        .map(|(extrema, &price)| {
            let (lo, hi) = (*extrema)?;
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some((price - lo) / range * 100.0)
        })
        .collect();

    let k = rolling_mean(&raw_k, smooth_k);
    let d = rolling_mean(&k, smooth_d);

    let indicator_type = IndicatorType::Stochastic {
        period,
        smooth_k,
        smooth_d,
    };

    StochasticSeries {
        k: IndicatorSeries::new(indicator_type.clone(), k),
        d: IndicatorSeries::new(indicator_type, d),
    }
}
