//! Backtest runner.
//!
//! Signals are generated over the whole series so the indicators can warm up
//! on history; only the trailing `days` signals are replayed through the
//! portfolio. The first replayed price is the start price of an accumulate
//! portfolio, the last price of the series values the final state.

use crate::domain::error::TradesimError;
use crate::domain::metrics::Performance;
use crate::domain::portfolio::{Goal, Portfolio};
use crate::domain::price::PriceSeries;
use crate::domain::signal::{generate_signals, Signal};
use crate::domain::strategy::StrategyKind;
use tracing::{debug, info};

pub const DEFAULT_DAYS: usize = 60;
pub const DEFAULT_WARMUP: usize = 200;
pub const DEFAULT_INITIAL_BALANCE: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub strategy: StrategyKind,
    pub allow_shorting: bool,
    pub initial_balance: f64,
    pub goal: Goal,
    /// Length of the simulation window.
    pub days: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            strategy: StrategyKind::GoldenCross,
            allow_shorting: false,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            goal: Goal::Currency,
            days: DEFAULT_DAYS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    /// Every signal over the full series, warm-up history included.
    pub signals: Vec<Signal>,
    /// Index into `signals` where the simulation window starts.
    pub window_start: usize,
    /// `None` when the series is empty.
    pub portfolio: Option<Portfolio>,
    pub performance: Option<Performance>,
}

impl BacktestResult {
    pub fn simulated_signals(&self) -> &[Signal] {
        &self.signals[self.window_start..]
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TradesimError> {
    info!(
        strategy = %config.strategy,
        goal = %config.goal,
        days = config.days,
        bars = series.len(),
        "starting backtest"
    );

    let signals = generate_signals(series, config.strategy, config.allow_shorting);
    let window_start = signals.len().saturating_sub(config.days);

    let start_price = signals.get(window_start).map(|s| s.price);
    let (Some(start_price), Some(final_price)) = (start_price, series.last_price()) else {
        info!("empty price series, nothing to simulate");
        return Ok(BacktestResult {
            signals,
            window_start,
            portfolio: None,
            performance: None,
        });
    };

    let mut portfolio = Portfolio::new(config.initial_balance, config.goal, start_price)?;
    for signal in &signals[window_start..] {
        let trades = portfolio.execute(signal)?;
        for trade in trades {
            debug!(
                index = trade.index,
                action = %trade.action,
                price = trade.price,
                amount = trade.amount,
                "trade executed"
            );
        }
        portfolio.record_equity(signal.index, signal.timestamp, signal.price);
    }

    let performance = Performance::compute(&portfolio, final_price);
    info!(
        trades = performance.trade_count,
        final_value = performance.final_value,
        return_pct = performance.return_pct,
        "backtest finished"
    );

    Ok(BacktestResult {
        signals,
        window_start,
        portfolio: Some(portfolio),
        performance: Some(performance),
    })
}
