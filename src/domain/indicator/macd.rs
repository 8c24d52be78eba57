//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: the line is defined from index slow-1, the signal line from
//! slow-1 + signal-1.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, calculate_ema, ema_of};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let line: Vec<Option<f64>> = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal = ema_of(&line, signal_period);

    let histogram: Vec<Option<f64>> = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    MacdSeries {
        line: IndicatorSeries::new(indicator_type.clone(), line),
        signal: IndicatorSeries::new(indicator_type.clone(), signal),
        histogram: IndicatorSeries::new(indicator_type, histogram),
    }
}

pub fn calculate_macd_default(prices: &[f64]) -> MacdSeries {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
