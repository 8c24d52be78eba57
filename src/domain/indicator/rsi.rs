//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: indices 0..n are undefined (need n price changes for the seed).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[f64], period: usize) -> IndicatorSeries {
    let mut values = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return IndicatorSeries::new(IndicatorType::Rsi(period), values);
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    values[period] = Some(rsi_from(avg_gain, avg_loss));

    for i in (period + 1)..prices.len() {
        let change = prices[i] - prices[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        values[i] = Some(rsi_from(avg_gain, avg_loss));
    }

    IndicatorSeries::new(IndicatorType::Rsi(period), values)
}

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
