//! Plain-text report adapter implementing ReportPort.
//!
//! Renders the performance summary, the final metric and the trade ledger.

use std::fmt::Write as _;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TradesimError;
use crate::domain::portfolio::Trade;
use crate::ports::report_port::ReportPort;
use chrono::DateTime;

pub struct ConsoleReport;

/// Epoch milliseconds as `YYYY-MM-DD`, or the raw number when out of range.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn format_trade(trade: &Trade) -> String {
    format!(
        "Date {}: {:<5} at ${:<9.2} | Amount: {:<8.4} | Value: ${:<10.2} | Bal($): ${:<10.2} | Stack: {:.4} | Reason: {}",
        format_timestamp(trade.timestamp),
        trade.action.to_string(),
        trade.price,
        trade.amount,
        trade.value,
        trade.post_cash,
        trade.post_asset,
        trade.reason,
    )
}

impl ConsoleReport {
    pub fn render(result: &BacktestResult, config: &BacktestConfig) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Results for Strategy: {}, Goal: {}",
            config.strategy, config.goal
        );

        let (Some(portfolio), Some(perf)) = (&result.portfolio, &result.performance) else {
            let _ = writeln!(out, "No price data: nothing was simulated.");
            return out;
        };

        let _ = writeln!(out, "Initial Value: ${:.2}", perf.initial_value);
        let _ = writeln!(out, "Final Portfolio Value: ${:.2}", perf.final_value);
        let _ = writeln!(
            out,
            "Total Profit/Loss: ${:.2} ({:.2}%)",
            perf.profit, perf.return_pct
        );
        let _ = writeln!(out, "Max Drawdown: -{:.1}%", perf.max_drawdown * 100.0);
        let _ = writeln!(out, "Trades: {}", perf.trade_count);
        let _ = writeln!(
            out,
            "Final Metric ({}): {:.4} {}",
            config.goal, perf.final_metric.value, perf.final_metric.unit
        );

        let _ = writeln!(out, "\n--- Trading Ledger ---");
        if portfolio.ledger().is_empty() {
            let _ = writeln!(out, "(no trades)");
        }
        for trade in portfolio.ledger() {
            let _ = writeln!(out, "{}", format_trade(trade));
        }
        out
    }
}

impl ReportPort for ConsoleReport {
    fn write(&self, result: &BacktestResult, config: &BacktestConfig) -> Result<(), TradesimError> {
        print!("{}", Self::render(result, config));
        Ok(())
    }
}
