#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tradesim::domain::price::PriceSeries;
use tradesim::domain::signal::{Action, Signal};

pub fn series_from(prices: &[f64]) -> PriceSeries {
    PriceSeries::from_prices(prices).unwrap()
}

/// `flat` bars at 100 followed by `high` bars at 200.
pub fn jump_prices(flat: usize, high: usize) -> Vec<f64> {
    let mut prices = vec![100.0; flat];
    prices.extend(std::iter::repeat(200.0).take(high));
    prices
}

/// A slow sine wave around 100, enough to trigger oscillator strategies.
pub fn wave_prices(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + 15.0 * (i as f64 / 8.0).sin())
        .collect()
}

pub fn signal(index: usize, price: f64, action: Action) -> Signal {
    Signal {
        index,
        timestamp: index as i64 * 86_400_000,
        price,
        action,
        indicators: BTreeMap::new(),
        reason: format!("test {}", action),
    }
}

/// Writes `content` to `name` inside a fresh temp dir. Keep the dir alive
/// for as long as the file is needed.
pub fn write_temp(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn prices_csv(prices: &[f64]) -> String {
    let mut out = String::from("timestamp,price\n");
    for (i, p) in prices.iter().enumerate() {
        out.push_str(&format!("{},{}\n", 1_704_067_200_000_i64 + i as i64 * 86_400_000, p));
    }
    out
}
