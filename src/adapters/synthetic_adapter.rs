//! Synthetic price source: geometric Brownian motion.
//!
//! P[0] = initial_price
//! P[i] = P[i-1] * exp(drift - volatility^2 / 2 + volatility * z),  z ~ N(0, 1)
//!
//! One point per day starting at `start_ms`. A fixed seed reproduces the same
//! series.

use crate::domain::error::TradesimError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

pub const DEFAULT_INITIAL_PRICE: f64 = 60_000.0;
pub const DEFAULT_DRIFT: f64 = 0.0005;
pub const DEFAULT_VOLATILITY: f64 = 0.05;
/// 2024-01-01T00:00:00Z
pub const DEFAULT_START_MS: i64 = 1_704_067_200_000;
const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPriceAdapter {
    pub days: usize,
    pub initial_price: f64,
    pub drift: f64,
    pub volatility: f64,
    pub seed: Option<u64>,
    pub start_ms: i64,
}

impl SyntheticPriceAdapter {
    pub fn new(days: usize) -> Self {
        Self {
            days,
            initial_price: DEFAULT_INITIAL_PRICE,
            drift: DEFAULT_DRIFT,
            volatility: DEFAULT_VOLATILITY,
            seed: None,
            start_ms: DEFAULT_START_MS,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn generate_prices(&self) -> Result<Vec<f64>, TradesimError> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| TradesimError::PriceData {
            reason: format!("normal distribution: {}", e),
        })?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut prices = Vec::with_capacity(self.days);
        if self.days == 0 {
            return Ok(prices);
        }

        let mut price = self.initial_price;
        prices.push(price);
        let base = self.drift - 0.5 * self.volatility.powi(2);
        for _ in 1..self.days {
            let z: f64 = normal.sample(&mut rng);
            price *= (base + self.volatility * z).exp();
            prices.push(price);
        }

        Ok(prices)
    }
}

impl PricePort for SyntheticPriceAdapter {
    fn load_prices(&self) -> Result<PriceSeries, TradesimError> {
        let points = self
            .generate_prices()?
            .into_iter()
            .enumerate()
            .map(|(i, price)| PricePoint {
                timestamp: self.start_ms + i as i64 * DAY_MS,
                price,
            })
            .collect();
        PriceSeries::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn generates_requested_length() {
        let prices = SyntheticPriceAdapter::new(260)
            .with_seed(Some(7))
            .generate_prices()
            .unwrap();
        assert_eq!(prices.len(), 260);
        assert_eq!(prices[0], DEFAULT_INITIAL_PRICE);
        assert!(prices.iter().all(|p| p.is_finite() && *p > 0.0));
    }

    #[test]
    fn zero_days_is_empty() {
        let series = SyntheticPriceAdapter::new(0).load_prices().unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = SyntheticPriceAdapter::new(50).with_seed(Some(42)).generate_prices().unwrap();
        let b = SyntheticPriceAdapter::new(50).with_seed(Some(42)).generate_prices().unwrap();
        let c = SyntheticPriceAdapter::new(50).with_seed(Some(43)).generate_prices().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_volatility_is_pure_drift() {
        let adapter = SyntheticPriceAdapter {
            volatility: 0.0,
            drift: 0.01,
            initial_price: 100.0,
            ..SyntheticPriceAdapter::new(3)
        };
        let prices = adapter.generate_prices().unwrap();
        assert_relative_eq!(prices[1], 100.0 * 0.01_f64.exp(), epsilon = 1e-9);
        assert_relative_eq!(prices[2], 100.0 * 0.02_f64.exp(), epsilon = 1e-9);
    }

    #[test]
    fn daily_timestamps() {
        let series = SyntheticPriceAdapter::new(3).with_seed(Some(1)).load_prices().unwrap();
        let points = series.points();
        assert_eq!(points[0].timestamp, DEFAULT_START_MS);
        assert_eq!(points[2].timestamp - points[0].timestamp, 2 * DAY_MS);
    }
}
