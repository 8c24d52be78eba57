//! Report output port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TradesimError;

/// Port for rendering or exporting a finished backtest.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, config: &BacktestConfig) -> Result<(), TradesimError>;
}
