//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, rolling_stddev};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(prices: &[f64], period: usize, stddev_mult_x100: u32) -> BollingerBands {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let stats = rolling_stddev(prices, period);

    let middle = stats.iter().map(|s| s.map(|(mean, _)| mean)).collect();
    let upper = stats
        .iter()
        .map(|s| s.map(|(mean, sd)| mean + mult * sd))
        .collect();
    let lower = stats
        .iter()
        .map(|s| s.map(|(mean, sd)| mean - mult * sd))
        .collect();

    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100,
    };

    BollingerBands {
        upper: IndicatorSeries::new(indicator_type.clone(), upper),
        middle: IndicatorSeries::new(indicator_type.clone(), middle),
        lower: IndicatorSeries::new(indicator_type, lower),
    }
}
