//! Portfolio state machine, trade ledger and equity tracking.
//!
//! The portfolio is flat, long or short depending on the sign of
//! `asset_holding`. Each action moves it between those states:
//!
//! | action | from short            | from flat         | from long              |
//! |--------|-----------------------|-------------------|------------------------|
//! | BUY    | COVER, then BUY       | BUY (if cash > 0) | BUY (if cash > 0)      |
//! | SELL   | no-op                 | no-op             | SELL                   |
//! | SHORT  | no-op                 | SHORT (if cash)   | SELL, then SHORT       |
//! | COVER  | COVER                 | no-op             | no-op                  |
//!
//! Opening a short keeps the sale proceeds as cash on top of the existing
//! balance (`cash += cash`), so a short position holds twice its notional in
//! cash until covered.

use crate::domain::error::TradesimError;
use crate::domain::position::{holding_value, Exposure};
use crate::domain::price::is_valid_price;
use crate::domain::signal::{Action, Signal};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const AUTO_COVER_REASON: &str = "Auto-covering for buy";
pub const AUTO_SELL_REASON: &str = "Closing long before shorting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Goal {
    /// Measure results in currency.
    #[default]
    Currency,
    /// Measure results in units of the asset.
    Accumulate,
}

impl Goal {
    pub fn unit(self) -> &'static str {
        match self {
            Goal::Currency => "$",
            Goal::Accumulate => "Assets",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Currency => f.write_str("usd"),
            Goal::Accumulate => f.write_str("accumulate"),
        }
    }
}

impl FromStr for Goal {
    type Err = TradesimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" | "currency" | "$" => Ok(Goal::Currency),
            "accumulate" | "assets" => Ok(Goal::Accumulate),
            _ => Err(TradesimError::InvalidGoal {
                value: s.to_string(),
            }),
        }
    }
}

/// One executed ledger entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub index: usize,
    pub timestamp: i64,
    pub action: Action,
    pub price: f64,
    pub amount: f64,
    pub value: f64,
    pub post_cash: f64,
    pub post_asset: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub index: usize,
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalMetric {
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    asset_holding: f64,
    ledger: Vec<Trade>,
    initial_balance: f64,
    initial_value: f64,
    goal: Goal,
    equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    /// A currency portfolio starts all cash. An accumulate portfolio converts
    /// the whole budget into `initial_balance / start_price` units up front.
    pub fn new(initial_balance: f64, goal: Goal, start_price: f64) -> Result<Self, TradesimError> {
        if !(initial_balance.is_finite() && initial_balance > 0.0) {
            return Err(TradesimError::InvalidBalance {
                balance: initial_balance,
            });
        }
        let (cash, asset_holding) = match goal {
            Goal::Currency => (initial_balance, 0.0),
            Goal::Accumulate => {
                if !is_valid_price(start_price) {
                    return Err(TradesimError::InvalidPrice {
                        index: 0,
                        price: start_price,
                    });
                }
                (0.0, initial_balance / start_price)
            }
        };

        Ok(Portfolio {
            cash,
            asset_holding,
            ledger: Vec::new(),
            initial_balance,
            initial_value: initial_balance,
            goal,
            equity_curve: Vec::new(),
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn asset_holding(&self) -> f64 {
        self.asset_holding
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn exposure(&self) -> Exposure {
        Exposure::of(self.asset_holding)
    }

    pub fn ledger(&self) -> &[Trade] {
        &self.ledger
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    /// Apply one signal. Returns the trades it appended (zero, one, or two
    /// when an auto-cover or auto-sell precedes the requested action).
    pub fn execute(&mut self, signal: &Signal) -> Result<&[Trade], TradesimError> {
        if !is_valid_price(signal.price) {
            return Err(TradesimError::InvalidPrice {
                index: signal.index,
                price: signal.price,
            });
        }

        let before = self.ledger.len();
        let price = signal.price;

        match signal.action {
            Action::Hold => {}
            Action::Buy => {
                if self.exposure().is_short() {
                    self.cover(signal, AUTO_COVER_REASON);
                }
                if self.cash > 0.0 {
                    let amount = self.cash / price;
                    self.asset_holding += amount;
                    self.cash = 0.0;
                    self.append(signal, Action::Buy, amount, amount * price, &signal.reason);
                } else {
                    debug!(index = signal.index, "BUY skipped: no cash");
                }
            }
            Action::Sell => {
                if self.exposure().is_long() {
                    self.sell(signal, &signal.reason);
                } else {
                    debug!(index = signal.index, "SELL skipped: not long");
                }
            }
            Action::Short => {
                if self.exposure().is_long() {
                    self.sell(signal, AUTO_SELL_REASON);
                }
                if self.exposure() == Exposure::Flat && self.cash > 0.0 {
                    let amount = self.cash / price;
                    self.cash += self.cash;
                    self.asset_holding -= amount;
                    self.append(signal, Action::Short, amount, amount * price, &signal.reason);
                } else {
                    debug!(index = signal.index, "SHORT skipped: already short or no cash");
                }
            }
            Action::Cover => {
                if self.exposure().is_short() {
                    self.cover(signal, &signal.reason);
                } else {
                    debug!(index = signal.index, "COVER skipped: not short");
                }
            }
        }

        Ok(&self.ledger[before..])
    }

    fn sell(&mut self, signal: &Signal, reason: &str) {
        let amount = self.asset_holding;
        let value = amount * signal.price;
        self.cash += value;
        self.asset_holding = 0.0;
        self.append(signal, Action::Sell, amount, value, reason);
    }

    fn cover(&mut self, signal: &Signal, reason: &str) {
        let amount = self.asset_holding.abs();
        let cost = amount * signal.price;
        self.cash -= cost;
        self.asset_holding = 0.0;
        self.append(signal, Action::Cover, amount, cost, reason);
    }

    fn append(&mut self, signal: &Signal, action: Action, amount: f64, value: f64, reason: &str) {
        self.ledger.push(Trade {
            index: signal.index,
            timestamp: signal.timestamp,
            action,
            price: signal.price,
            amount,
            value,
            post_cash: self.cash,
            post_asset: self.asset_holding,
            reason: reason.to_string(),
        });
    }

    /// Cash plus the signed market value of the holding.
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + holding_value(self.asset_holding, price)
    }

    pub fn final_metric(&self, final_price: f64) -> FinalMetric {
        let total = self.value_at(final_price);
        let value = match self.goal {
            Goal::Currency => total,
            Goal::Accumulate => total / final_price,
        };
        FinalMetric {
            value,
            unit: self.goal.unit(),
        }
    }

    pub fn record_equity(&mut self, index: usize, timestamp: i64, price: f64) {
        let value = self.value_at(price);
        self.equity_curve.push(EquityPoint {
            index,
            timestamp,
            value,
        });
    }
}
