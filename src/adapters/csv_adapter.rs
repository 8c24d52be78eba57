//! CSV file price adapter.
//!
//! Expects a header row and `timestamp,price` columns. A timestamp is either
//! epoch milliseconds or a `YYYY-MM-DD` date (midnight UTC). Rows keep file
//! order.

use crate::domain::error::TradesimError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

pub fn parse_timestamp(raw: &str) -> Result<i64, TradesimError> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| TradesimError::PriceData {
        reason: format!("invalid timestamp '{}': expected epoch ms or YYYY-MM-DD", raw),
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| TradesimError::PriceData {
            reason: format!("invalid date '{}'", raw),
        })
}

impl PricePort for CsvPriceAdapter {
    fn load_prices(&self) -> Result<PriceSeries, TradesimError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradesimError::PriceData {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TradesimError::PriceData {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = parse_timestamp(record.get(0).ok_or_else(|| TradesimError::PriceData {
                reason: format!("row {}: missing timestamp column", row + 1),
            })?)?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| TradesimError::PriceData {
                    reason: format!("row {}: missing price column", row + 1),
                })?
                .trim()
                .parse()
                .map_err(|e| TradesimError::PriceData {
                    reason: format!("row {}: invalid price value: {}", row + 1, e),
                })?;

            points.push(PricePoint { timestamp, price });
        }

        PriceSeries::new(points)
    }
}
