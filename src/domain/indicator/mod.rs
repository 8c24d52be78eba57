//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a price slice and returns series of
//! the same length. Warm-up positions hold `None`, never a placeholder number:
//! the signal generator treats any `None` operand as "no signal".
//!
//! - `IndicatorType`: indicator identity + parameters, shown in strategy legends
//! - `IndicatorSeries`: an aligned series of optional values

pub mod bollinger;
pub mod cci;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod psar;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod williams_r;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use cci::calculate_cci;
pub use donchian::{calculate_donchian, DonchianChannel};
pub use ema::{calculate_ema, ema_of};
pub use macd::{calculate_macd, calculate_macd_default, MacdSeries};
pub use psar::calculate_psar;
pub use rsi::calculate_rsi;
pub use sma::{calculate_sma, rolling_mean};
pub use stddev::rolling_stddev;
pub use stochastic::{calculate_stochastic, StochasticSeries};
pub use williams_r::calculate_williams_r;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Cci(usize),
    WilliamsR(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Stochastic {
        period: usize,
        smooth_k: usize,
        smooth_d: usize,
    },
    Psar {
        step_x1000: u32,
        max_x1000: u32,
    },
    Donchian(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Vec<Option<f64>>) -> Self {
        Self {
            indicator_type,
            values,
        }
    }

    /// Value at `index`; `None` during warm-up or past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Cci(period) => write!(f, "CCI({})", period),
            IndicatorType::WilliamsR(period) => write!(f, "WILLIAMS_R({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => write!(f, "STOCHASTIC({},{},{})", period, smooth_k, smooth_d),
            IndicatorType::Psar {
                step_x1000,
                max_x1000,
            } => {
                let step = *step_x1000 as f64 / 1000.0;
                let max = *max_x1000 as f64 / 1000.0;
                write!(f, "PSAR({},{})", step, max)
            }
            IndicatorType::Donchian(period) => write!(f, "DONCHIAN({})", period),
        }
    }
}
