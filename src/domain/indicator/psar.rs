//! Parabolic SAR over closing prices.
//!
//! Inherently sequential: maintains trend direction, extreme point (EP) and
//! acceleration factor (AF).
//!
//! SAR[i] = SAR[i-1] + AF * (EP - SAR[i-1])
//! - a new extreme in the trend direction moves EP and raises AF by `step`,
//!   capped at `max`
//! - a price crossing SAR flips the trend: SAR jumps to the old EP, EP resets
//!   to the current price, AF resets to `step`
//!
//! Seeded at index 0 with SAR = EP = P[0] in an up trend, so every index is
//! defined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_STEP: f64 = 0.02;
pub const DEFAULT_MAX: f64 = 0.2;

pub fn calculate_psar(prices: &[f64], step: f64, max: f64) -> IndicatorSeries {
    let indicator_type = IndicatorType::Psar {
        step_x1000: (step * 1000.0).round() as u32,
        max_x1000: (max * 1000.0).round() as u32,
    };

    let mut values = Vec::with_capacity(prices.len());
    let Some(&first) = prices.first() else {
        return IndicatorSeries::new(indicator_type, values);
    };

    let mut rising = true;
    let mut sar = first;
    let mut ep = first;
    let mut af = step;
    values.push(Some(sar));

    for &price in &prices[1..] {
        sar += af * (ep - sar);

        if rising {
            if price < sar {
                rising = false;
                sar = ep;
                ep = price;
                af = step;
            } else if price > ep {
                ep = price;
                af = (af + step).min(max);
            }
        } else if price > sar {
            rising = true;
            sar = ep;
            ep = price;
            af = step;
        } else if price < ep {
            ep = price;
            af = (af + step).min(max);
        }

        values.push(Some(sar));
    }

    IndicatorSeries::new(indicator_type, values)
}
