//! Donchian Channel: highest and lowest price over a lookback window.
//!
//! - Upper: max(P[i-period+1..=i])
//! - Lower: min(P[i-period+1..=i])
//!
//! Warmup: first (period-1) values are `None`. The window extrema are shared
//! with the Stochastic and Williams %R oscillators.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct DonchianChannel {
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// `(min, max)` of each full trailing window.
pub fn rolling_extrema(prices: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut out = vec![None; prices.len()];
    if period == 0 {
        return out;
    }

    for i in (period - 1)..prices.len() {
        let window = &prices[i + 1 - period..=i];
        let (lo, hi) = window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });
        out[i] = Some((lo, hi));
    }
    out
}

pub fn calculate_donchian(prices: &[f64], period: usize) -> DonchianChannel {
    let extrema = rolling_extrema(prices, period);
    let upper = extrema.iter().map(|e| e.map(|(_, hi)| hi)).collect();
    let lower = extrema.iter().map(|e| e.map(|(lo, _)| lo)).collect();

    DonchianChannel {
        upper: IndicatorSeries::new(IndicatorType::Donchian(period), upper),
        lower: IndicatorSeries::new(IndicatorType::Donchian(period), lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donchian_warmup() {
        let channel = calculate_donchian(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(channel.upper.values[0], None);
        assert_eq!(channel.lower.values[1], None);
        assert_eq!(channel.upper.get(2), Some(3.0));
        assert_eq!(channel.lower.get(2), Some(1.0));
    }

    #[test]
    fn donchian_tracks_window() {
        let channel = calculate_donchian(&[5.0, 1.0, 9.0, 4.0, 3.0], 3);
        assert_eq!(channel.upper.get(2), Some(9.0));
        assert_eq!(channel.lower.get(2), Some(1.0));
        assert_eq!(channel.upper.get(4), Some(9.0));
        assert_eq!(channel.lower.get(4), Some(3.0));
    }

    #[test]
    fn donchian_upper_never_below_lower() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let channel = calculate_donchian(&prices, DEFAULT_PERIOD);
        for i in 0..prices.len() {
            if let (Some(up), Some(lo)) = (channel.upper.get(i), channel.lower.get(i)) {
                assert!(up >= lo);
                assert!(prices[i] <= up && prices[i] >= lo);
            }
        }
    }

    #[test]
    fn extrema_period_zero() {
        assert!(rolling_extrema(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }
}
