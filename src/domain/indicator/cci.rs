//! Commodity Channel Index over closing prices.
//!
//! CCI[i] = (P[i] - SMA(n)[i]) / (0.015 * MAD[i])
//! where MAD is the mean absolute deviation from the window mean.
//! MAD == 0 (flat window) yields `None`.
//! Warmup: first (n-1) values are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_PERIOD: usize = 20;
const LAMBERT_CONSTANT: f64 = 0.015;

pub fn calculate_cci(prices: &[f64], period: usize) -> IndicatorSeries {
    let mut values = vec![None; prices.len()];
    if period == 0 {
        return IndicatorSeries::new(IndicatorType::Cci(period), values);
    }

    for i in (period - 1)..prices.len() {
        let window = &prices[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mad = window.iter().map(|p| (p - mean).abs()).sum::<f64>() / period as f64;
        if mad == 0.0 {
            continue;
        }
        values[i] = Some((prices[i] - mean) / (LAMBERT_CONSTANT * mad));
    }

    IndicatorSeries::new(IndicatorType::Cci(period), values)
}
