//! Price series representation.
//!
//! A `PriceSeries` is the only input the engine consumes. Every price is
//! validated on construction so that indicator and portfolio code never sees a
//! non-finite or non-positive value.

use crate::domain::error::TradesimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Epoch milliseconds, or the positional index when no timestamps exist.
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

/// Finite and strictly positive.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, TradesimError> {
        if let Some((index, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !is_valid_price(p.price))
        {
            return Err(TradesimError::InvalidPrice {
                index,
                price: point.price,
            });
        }
        Ok(Self { points })
    }

    /// Build a series using the positional index as the time axis.
    pub fn from_prices(prices: &[f64]) -> Result<Self, TradesimError> {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: i as i64,
                price,
            })
            .collect();
        Self::new(points)
    }

    /// Build a series from parallel price and timestamp arrays.
    pub fn with_timestamps(prices: &[f64], timestamps: &[i64]) -> Result<Self, TradesimError> {
        if prices.len() != timestamps.len() {
            return Err(TradesimError::TimestampMismatch {
                prices: prices.len(),
                timestamps: timestamps.len(),
            });
        }
        let points = prices
            .iter()
            .zip(timestamps)
            .map(|(&price, &timestamp)| PricePoint { timestamp, price })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// The trailing `count` points (all of them when `count` exceeds the length).
    pub fn tail(&self, count: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(count);
        &self.points[start..]
    }
}
