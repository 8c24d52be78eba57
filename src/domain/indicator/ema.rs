//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the mean of the first n defined values, then
//! EMA[i] = V[i]*k + EMA[prev]*(1-k).
//! Undefined inputs stay undefined, so the EMA of a derived series (MACD line)
//! starts only once the derived series itself is defined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(prices: &[f64], period: usize) -> IndicatorSeries {
    let input: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
    IndicatorSeries::new(IndicatorType::Ema(period), ema_of(&input, period))
}

/// EMA over a series that may contain undefined positions.
pub fn ema_of(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut ema = 0.0;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else { continue };
        if count < period {
            sum += v;
            count += 1;
            if count == period {
                ema = sum / period as f64;
                out[i] = Some(ema);
            }
        } else {
            ema = v * k + ema * (1.0 - k);
            out[i] = Some(ema);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_warmup() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_eq!(series.values[0], None);
        assert_eq!(series.values[1], None);
        assert!(series.values[2].is_some());
        assert!(series.values[3].is_some());
        assert!(series.values[4].is_some());
    }

    #[test]
    fn ema_period_1() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_relative_eq!(series.get(0).unwrap(), 10.0);
        assert_relative_eq!(series.get(1).unwrap(), 20.0);
        assert_relative_eq!(series.get(2).unwrap(), 30.0);
    }

    #[test]
    fn ema_seed_is_sma() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(series.get(2).unwrap(), 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(series.get(3).unwrap(), ema_3);
        assert_relative_eq!(series.get(4).unwrap(), ema_4);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 5], 3);
        for i in 2..5 {
            assert_relative_eq!(series.get(i).unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_skips_leading_undefined() {
        let values = vec![None, None, Some(2.0), Some(4.0), Some(6.0)];
        let out = ema_of(&values, 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert_relative_eq!(out[3].unwrap(), 3.0);
        let k = 2.0 / 3.0;
        assert_relative_eq!(out[4].unwrap(), 6.0 * k + 3.0 * (1.0 - k));
    }

    #[test]
    fn ema_indicator_type() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 5);
        assert_eq!(series.indicator_type, IndicatorType::Ema(5));
        assert!(series.values.iter().all(Option::is_none));
    }

    #[test]
    fn ema_empty_and_period_0() {
        assert!(calculate_ema(&[], 3).is_empty());
        let series = calculate_ema(&[10.0, 20.0], 0);
        assert!(series.values.iter().all(Option::is_none));
    }
}
