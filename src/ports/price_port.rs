//! Price source port trait.

use crate::domain::error::TradesimError;
use crate::domain::price::PriceSeries;

/// A source of chronologically ordered prices for one asset.
pub trait PricePort {
    fn load_prices(&self) -> Result<PriceSeries, TradesimError>;
}
