//! Strategy catalog.
//!
//! Strategies are a closed set. Each [`StrategyKind`] is registered in
//! [`REGISTRY`] with a builder that computes the indicator series the
//! strategy needs and returns a [`StrategyPlan`]: a bullish rule, a bearish
//! rule, and the fixed reason strings attached to signals from each branch.
//!
//! `short_*` variants reuse the plan of their base strategy (except
//! `short_mean_reversion`, which widens the bands to ±10%) and force shorting
//! on.

use crate::domain::error::TradesimError;
use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_cci, calculate_donchian, calculate_ema,
    calculate_macd_default, calculate_psar, calculate_rsi, calculate_sma, calculate_stochastic,
    calculate_williams_r, cci, donchian, psar, rsi, stochastic, williams_r, IndicatorSeries,
};
use crate::domain::rule::{Operand, Rule};
use crate::domain::rule_eval::NamedSeries;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyKind {
    GoldenCross,
    Rsi,
    Macd,
    Bollinger,
    MeanReversion,
    EmaCross,
    SmaCross,
    Stochastic,
    WilliamsR,
    Cci,
    Psar,
    Donchian,
    ShortRsi,
    ShortMacd,
    ShortBollinger,
    ShortMeanReversion,
}

/// How a strategy maps its bullish/bearish branches once shorting is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortSupport {
    /// Bullish covers, bearish shorts.
    Full,
    /// Bullish still buys, bearish shorts.
    Reversal,
}

#[derive(Debug, Clone)]
pub struct StrategyPlan {
    pub indicators: NamedSeries,
    pub bullish: Rule,
    pub bearish: Rule,
    pub bullish_reason: &'static str,
    pub bearish_reason: &'static str,
}

impl StrategyPlan {
    /// Indicator names with their definition, e.g. `ma7=SMA(7), ma30=SMA(30)`.
    pub fn legend(&self) -> String {
        self.indicators
            .iter()
            .map(|(name, series)| format!("{}={}", name, series.indicator_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct StrategyEntry {
    pub kind: StrategyKind,
    pub name: &'static str,
    pub description: &'static str,
    pub short_support: ShortSupport,
    pub build: fn(&[f64]) -> StrategyPlan,
}

/// Ordered by `StrategyKind` discriminant.
pub static REGISTRY: [StrategyEntry; 16] = [
    StrategyEntry {
        kind: StrategyKind::GoldenCross,
        name: "golden_cross",
        description: "7-period MA crossing the 30-period MA",
        short_support: ShortSupport::Reversal,
        build: golden_cross,
    },
    StrategyEntry {
        kind: StrategyKind::Rsi,
        name: "rsi",
        description: "RSI(14) leaving the 30/70 zones",
        short_support: ShortSupport::Full,
        build: rsi_plan,
    },
    StrategyEntry {
        kind: StrategyKind::Macd,
        name: "macd",
        description: "MACD(12,26,9) line crossing its signal line",
        short_support: ShortSupport::Full,
        build: macd_plan,
    },
    StrategyEntry {
        kind: StrategyKind::Bollinger,
        name: "bollinger",
        description: "Price breaking out of Bollinger(20,2) bands",
        short_support: ShortSupport::Full,
        build: bollinger_plan,
    },
    StrategyEntry {
        kind: StrategyKind::MeanReversion,
        name: "mean_reversion",
        description: "Price moving 5% away from the 20-period MA",
        short_support: ShortSupport::Full,
        build: mean_reversion_plan,
    },
    StrategyEntry {
        kind: StrategyKind::EmaCross,
        name: "ema_cross",
        description: "EMA12 crossing EMA26",
        short_support: ShortSupport::Reversal,
        build: ema_cross,
    },
    StrategyEntry {
        kind: StrategyKind::SmaCross,
        name: "sma_cross",
        description: "SMA50 crossing SMA200",
        short_support: ShortSupport::Reversal,
        build: sma_cross,
    },
    StrategyEntry {
        kind: StrategyKind::Stochastic,
        name: "stochastic",
        description: "%K crossing %D inside the 20/80 zones",
        short_support: ShortSupport::Reversal,
        build: stochastic_plan,
    },
    StrategyEntry {
        kind: StrategyKind::WilliamsR,
        name: "williams_r",
        description: "Williams %R(14) leaving the -80/-20 zones",
        short_support: ShortSupport::Reversal,
        build: williams_plan,
    },
    StrategyEntry {
        kind: StrategyKind::Cci,
        name: "cci",
        description: "CCI(20) leaving the -100/100 zones",
        short_support: ShortSupport::Reversal,
        build: cci_plan,
    },
    StrategyEntry {
        kind: StrategyKind::Psar,
        name: "psar",
        description: "Price crossing Parabolic SAR(0.02,0.2)",
        short_support: ShortSupport::Reversal,
        build: psar_plan,
    },
    StrategyEntry {
        kind: StrategyKind::Donchian,
        name: "donchian",
        description: "Price breaking the prior 20-bar channel",
        short_support: ShortSupport::Reversal,
        build: donchian_plan,
    },
    StrategyEntry {
        kind: StrategyKind::ShortRsi,
        name: "short_rsi",
        description: "rsi with shorting",
        short_support: ShortSupport::Full,
        build: rsi_plan,
    },
    StrategyEntry {
        kind: StrategyKind::ShortMacd,
        name: "short_macd",
        description: "macd with shorting",
        short_support: ShortSupport::Full,
        build: macd_plan,
    },
    StrategyEntry {
        kind: StrategyKind::ShortBollinger,
        name: "short_bollinger",
        description: "bollinger with shorting",
        short_support: ShortSupport::Full,
        build: bollinger_plan,
    },
    StrategyEntry {
        kind: StrategyKind::ShortMeanReversion,
        name: "short_mean_reversion",
        description: "Price moving 10% away from the 20-period MA, with shorting",
        short_support: ShortSupport::Full,
        build: short_mean_reversion_plan,
    },
];

impl StrategyKind {
    pub const ALL: [StrategyKind; 16] = [
        StrategyKind::GoldenCross,
        StrategyKind::Rsi,
        StrategyKind::Macd,
        StrategyKind::Bollinger,
        StrategyKind::MeanReversion,
        StrategyKind::EmaCross,
        StrategyKind::SmaCross,
        StrategyKind::Stochastic,
        StrategyKind::WilliamsR,
        StrategyKind::Cci,
        StrategyKind::Psar,
        StrategyKind::Donchian,
        StrategyKind::ShortRsi,
        StrategyKind::ShortMacd,
        StrategyKind::ShortBollinger,
        StrategyKind::ShortMeanReversion,
    ];

    pub fn entry(self) -> &'static StrategyEntry {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn description(self) -> &'static str {
        self.entry().description
    }

    pub fn is_short_variant(self) -> bool {
        matches!(
            self,
            StrategyKind::ShortRsi
                | StrategyKind::ShortMacd
                | StrategyKind::ShortBollinger
                | StrategyKind::ShortMeanReversion
        )
    }

    pub fn short_support(self) -> ShortSupport {
        self.entry().short_support
    }

    pub fn plan(self, prices: &[f64]) -> StrategyPlan {
        (self.entry().build)(prices)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = TradesimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|entry| entry.name == wanted)
            .map(|entry| entry.kind)
            .ok_or_else(|| TradesimError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

/// The set of strategies a run may select from.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyCatalog {
    enabled: Vec<StrategyKind>,
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self::all()
    }
}

impl StrategyCatalog {
    pub fn all() -> Self {
        Self {
            enabled: StrategyKind::ALL.to_vec(),
        }
    }

    /// Narrow the catalog to `names`. Every name must be a known strategy.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, TradesimError> {
        let mut enabled = Vec::with_capacity(names.len());
        for name in names {
            let kind: StrategyKind = name.as_ref().parse()?;
            if !enabled.contains(&kind) {
                enabled.push(kind);
            }
        }
        enabled.sort();
        Ok(Self { enabled })
    }

    pub fn enabled(&self) -> &[StrategyKind] {
        &self.enabled
    }

    pub fn select(&self, name: &str) -> Result<StrategyKind, TradesimError> {
        let kind: StrategyKind = name.parse()?;
        if !self.enabled.contains(&kind) {
            warn!(strategy = %kind, "strategy is not enabled in this configuration");
            return Err(TradesimError::StrategyDisabled {
                name: kind.name().to_string(),
            });
        }
        Ok(kind)
    }
}

fn named(entries: Vec<(&'static str, IndicatorSeries)>) -> NamedSeries {
    entries.into_iter().collect()
}

fn crossover(
    fast: (&'static str, IndicatorSeries),
    slow: (&'static str, IndicatorSeries),
    reasons: (&'static str, &'static str),
) -> StrategyPlan {
    let (fast_name, slow_name) = (fast.0, slow.0);
    StrategyPlan {
        indicators: named(vec![fast, slow]),
        bullish: Rule::cross_above(Operand::Indicator(fast_name), Operand::Indicator(slow_name)),
        bearish: Rule::cross_below(Operand::Indicator(fast_name), Operand::Indicator(slow_name)),
        bullish_reason: reasons.0,
        bearish_reason: reasons.1,
    }
}

/// Bullish when `name` climbs out of the low zone, bearish when it drops out
/// of the high zone.
fn zone_exit(
    indicators: NamedSeries,
    name: &'static str,
    low: f64,
    high: f64,
    reasons: (&'static str, &'static str),
) -> StrategyPlan {
    StrategyPlan {
        indicators,
        bullish: Rule::cross_above(Operand::Indicator(name), Operand::Constant(low)),
        bearish: Rule::cross_below(Operand::Indicator(name), Operand::Constant(high)),
        bullish_reason: reasons.0,
        bearish_reason: reasons.1,
    }
}

fn golden_cross(prices: &[f64]) -> StrategyPlan {
    crossover(
        ("ma7", calculate_sma(prices, 7)),
        ("ma30", calculate_sma(prices, 30)),
        ("MA7 crossed above MA30", "MA7 crossed below MA30"),
    )
}

fn ema_cross(prices: &[f64]) -> StrategyPlan {
    crossover(
        ("ema12", calculate_ema(prices, 12)),
        ("ema26", calculate_ema(prices, 26)),
        ("EMA12 crossed above EMA26", "EMA12 crossed below EMA26"),
    )
}

fn sma_cross(prices: &[f64]) -> StrategyPlan {
    crossover(
        ("sma50", calculate_sma(prices, 50)),
        ("sma200", calculate_sma(prices, 200)),
        ("SMA50 crossed above SMA200", "SMA50 crossed below SMA200"),
    )
}

fn macd_plan(prices: &[f64]) -> StrategyPlan {
    let series = calculate_macd_default(prices);
    let mut plan = crossover(
        ("macd", series.line),
        ("signal", series.signal),
        ("MACD crossed above signal line", "MACD crossed below signal line"),
    );
    plan.indicators.insert("histogram", series.histogram);
    plan
}

fn rsi_plan(prices: &[f64]) -> StrategyPlan {
    zone_exit(
        named(vec![("rsi", calculate_rsi(prices, rsi::DEFAULT_PERIOD))]),
        "rsi",
        30.0,
        70.0,
        ("RSI crossed above 30 (oversold exit)", "RSI crossed below 70 (overbought exit)"),
    )
}

fn williams_plan(prices: &[f64]) -> StrategyPlan {
    zone_exit(
        named(vec![(
            "williams_r",
            calculate_williams_r(prices, williams_r::DEFAULT_PERIOD),
        )]),
        "williams_r",
        -80.0,
        -20.0,
        ("Williams %R crossed above -80", "Williams %R crossed below -20"),
    )
}

fn cci_plan(prices: &[f64]) -> StrategyPlan {
    zone_exit(
        named(vec![("cci", calculate_cci(prices, cci::DEFAULT_PERIOD))]),
        "cci",
        -100.0,
        100.0,
        ("CCI crossed above -100", "CCI crossed below 100"),
    )
}

fn bollinger_plan(prices: &[f64]) -> StrategyPlan {
    let bands = calculate_bollinger(prices, bollinger::DEFAULT_PERIOD, bollinger::DEFAULT_MULT_X100);
    StrategyPlan {
        indicators: named(vec![
            ("upper", bands.upper),
            ("middle", bands.middle),
            ("lower", bands.lower),
        ]),
        bullish: Rule::cross_below(Operand::Price, Operand::Indicator("lower")),
        bearish: Rule::cross_above(Operand::Price, Operand::Indicator("upper")),
        bullish_reason: "Price broke below lower Bollinger band",
        bearish_reason: "Price broke above upper Bollinger band",
    }
}

fn mean_reversion_with(
    prices: &[f64],
    (lower, upper): (f64, f64),
    reasons: (&'static str, &'static str),
) -> StrategyPlan {
    let band = |factor| Operand::Scaled {
        name: "ma20",
        factor,
    };
    StrategyPlan {
        indicators: named(vec![("ma20", calculate_sma(prices, 20))]),
        bullish: Rule::FallsThrough {
            left: Operand::Price,
            level: band(lower),
        },
        bearish: Rule::RisesThrough {
            left: Operand::Price,
            level: band(upper),
        },
        bullish_reason: reasons.0,
        bearish_reason: reasons.1,
    }
}

fn mean_reversion_plan(prices: &[f64]) -> StrategyPlan {
    mean_reversion_with(
        prices,
        (0.95, 1.05),
        ("Price fell 5% below MA20", "Price rose 5% above MA20"),
    )
}

fn short_mean_reversion_plan(prices: &[f64]) -> StrategyPlan {
    mean_reversion_with(
        prices,
        (0.90, 1.10),
        ("Price fell 10% below MA20", "Price rose 10% above MA20"),
    )
}

fn stochastic_plan(prices: &[f64]) -> StrategyPlan {
    let series = calculate_stochastic(
        prices,
        stochastic::DEFAULT_PERIOD,
        stochastic::DEFAULT_SMOOTH_K,
        stochastic::DEFAULT_SMOOTH_D,
    );
    let k = || Operand::Indicator("k");
    let d = || Operand::Indicator("d");
    StrategyPlan {
        indicators: named(vec![("k", series.k), ("d", series.d)]),
        bullish: Rule::All(vec![
            Rule::cross_above(k(), d()),
            Rule::Below {
                left: k(),
                right: Operand::Constant(20.0),
            },
        ]),
        bearish: Rule::All(vec![
            Rule::cross_below(k(), d()),
            Rule::Above {
                left: k(),
                right: Operand::Constant(80.0),
            },
        ]),
        bullish_reason: "%K crossed above %D in oversold zone",
        bearish_reason: "%K crossed below %D in overbought zone",
    }
}

fn psar_plan(prices: &[f64]) -> StrategyPlan {
    StrategyPlan {
        indicators: named(vec![(
            "psar",
            calculate_psar(prices, psar::DEFAULT_STEP, psar::DEFAULT_MAX),
        )]),
        bullish: Rule::cross_above(Operand::Price, Operand::Indicator("psar")),
        bearish: Rule::cross_below(Operand::Price, Operand::Indicator("psar")),
        bullish_reason: "Price crossed above Parabolic SAR",
        bearish_reason: "Price crossed below Parabolic SAR",
    }
}

fn donchian_plan(prices: &[f64]) -> StrategyPlan {
    let channel = calculate_donchian(prices, donchian::DEFAULT_PERIOD);
    StrategyPlan {
        indicators: named(vec![("up", channel.upper), ("lo", channel.lower)]),
        bullish: Rule::BreaksAbove {
            left: Operand::Price,
            right: Operand::Indicator("up"),
        },
        bearish: Rule::BreaksBelow {
            left: Operand::Price,
            right: Operand::Indicator("lo"),
        },
        bullish_reason: "Price broke above prior 20-bar high",
        bearish_reason: "Price broke below prior 20-bar low",
    }
}
