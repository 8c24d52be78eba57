//! Williams %R.
//!
//! %R[i] = (max(window) - P[i]) / (max(window) - min(window)) * -100
//! Range [-100, 0]. A flat window yields `None`.
//! Warmup: first (period-1) values are `None`.

use crate::domain::indicator::donchian::rolling_extrema;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_williams_r(prices: &[f64], period: usize) -> IndicatorSeries {
    let values = rolling_extrema(prices, period)
        .iter()
        .zip(prices)
        .map(|(extrema, &price)| {
            let (lo, hi) = (*extrema)?;
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some((hi - price) / range * -100.0)
        })
        .collect();

    IndicatorSeries::new(IndicatorType::WilliamsR(period), values)
}
