//! Signal generation.
//!
//! Evaluates a strategy plan at every index of a price series and emits one
//! [`Signal`] per index. The bullish rule is checked first; the bearish rule
//! only when the bullish one did not fire.

use crate::domain::price::PriceSeries;
use crate::domain::rule_eval::evaluate;
use crate::domain::strategy::{ShortSupport, StrategyKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const FIRST_BAR_REASON: &str = "First bar: no prior values";
pub const WARMUP_REASON: &str = "Indicators warming up";
pub const NO_TRIGGER_REASON: &str = "No signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Hold,
    Buy,
    Sell,
    Short,
    Cover,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Hold => "HOLD",
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Short => "SHORT",
            Action::Cover => "COVER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub index: usize,
    pub timestamp: i64,
    pub price: f64,
    pub action: Action,
    pub indicators: BTreeMap<&'static str, Option<f64>>,
    pub reason: String,
}

/// Actions emitted for the bullish and bearish branch of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionProfile {
    pub bullish: Action,
    pub bearish: Action,
}

impl ActionProfile {
    pub fn new(support: ShortSupport, shorting: bool) -> Self {
        match (shorting, support) {
            (false, _) => Self {
                bullish: Action::Buy,
                bearish: Action::Sell,
            },
            (true, ShortSupport::Full) => Self {
                bullish: Action::Cover,
                bearish: Action::Short,
            },
            (true, ShortSupport::Reversal) => Self {
                bullish: Action::Buy,
                bearish: Action::Short,
            },
        }
    }

    /// A `short_` strategy name turns shorting on regardless of the flag.
    pub fn for_strategy(kind: StrategyKind, allow_shorting: bool) -> Self {
        Self::new(kind.short_support(), allow_shorting || kind.is_short_variant())
    }
}

pub fn generate_signals(
    series: &PriceSeries,
    kind: StrategyKind,
    allow_shorting: bool,
) -> Vec<Signal> {
    if series.is_empty() {
        return Vec::new();
    }

    let prices = series.prices();
    let plan = kind.plan(&prices);
    let profile = ActionProfile::for_strategy(kind, allow_shorting);

    series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let indicators = plan
                .indicators
                .iter()
                .map(|(name, s)| (*name, s.get(i)))
                .collect();

            let (action, reason) = if i == 0 {
                (Action::Hold, FIRST_BAR_REASON)
            } else {
                let bullish = evaluate(&plan.bullish, &prices, &plan.indicators, i);
                if bullish == Some(true) {
                    (profile.bullish, plan.bullish_reason)
                } else {
                    let bearish = evaluate(&plan.bearish, &prices, &plan.indicators, i);
                    match (bullish, bearish) {
                        (_, Some(true)) => (profile.bearish, plan.bearish_reason),
                        (None, _) | (_, None) => (Action::Hold, WARMUP_REASON),
                        _ => (Action::Hold, NO_TRIGGER_REASON),
                    }
                }
            };

            Signal {
                index: i,
                timestamp: point.timestamp,
                price: point.price,
                action,
                indicators,
                reason: reason.to_string(),
            }
        })
        .collect()
}
