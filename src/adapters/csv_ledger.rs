//! CSV ledger export implementing ReportPort.

use std::path::PathBuf;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TradesimError;
use crate::domain::portfolio::Trade;
use crate::ports::report_port::ReportPort;

pub struct CsvLedgerExport {
    path: PathBuf,
}

impl CsvLedgerExport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn write_trades(&self, trades: &[Trade]) -> Result<(), TradesimError> {
        let to_io = |e: csv::Error| TradesimError::Io(std::io::Error::other(e));

        let mut writer = csv::Writer::from_path(&self.path).map_err(to_io)?;
        if trades.is_empty() {
            writer
                .write_record([
                    "index",
                    "timestamp",
                    "action",
                    "price",
                    "amount",
                    "value",
                    "post_cash",
                    "post_asset",
                    "reason",
                ])
                .map_err(to_io)?;
        }
        for trade in trades {
            writer.serialize(trade).map_err(to_io)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvLedgerExport {
    fn write(&self, result: &BacktestResult, _config: &BacktestConfig) -> Result<(), TradesimError> {
        let trades = result
            .portfolio
            .as_ref()
            .map(|p| p.ledger())
            .unwrap_or_default();
        self.write_trades(trades)
    }
}
