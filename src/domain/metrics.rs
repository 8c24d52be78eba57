//! Performance summary of a finished simulation.

use super::portfolio::{EquityPoint, FinalMetric, Portfolio};

#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub initial_value: f64,
    pub final_value: f64,
    pub profit: f64,
    /// Percent, e.g. `12.5` for +12.5%.
    pub return_pct: f64,
    pub final_metric: FinalMetric,
    pub trade_count: usize,
    /// Fraction of the running peak, `0.25` for a 25% drawdown.
    pub max_drawdown: f64,
    /// Longest run of equity points spent below a prior peak.
    pub max_drawdown_duration: usize,
}

impl Performance {
    pub fn compute(portfolio: &Portfolio, final_price: f64) -> Self {
        let initial_value = portfolio.initial_value();
        let final_value = portfolio.value_at(final_price);
        let profit = final_value - initial_value;

        let return_pct = if initial_value > 0.0 {
            profit / initial_value * 100.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(portfolio.equity_curve());

        Performance {
            initial_value,
            final_value,
            profit,
            return_pct,
            final_metric: portfolio.final_metric(final_price),
            trade_count: portfolio.ledger().len(),
            max_drawdown,
            max_drawdown_duration,
        }
    }
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, usize) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.value;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for point in equity_curve {
        if point.value >= peak {
            peak = point.value;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::Goal;
    use crate::domain::signal::{Action, Signal};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn make_equity_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityPoint {
                index: i,
                timestamp: i as i64,
                value: v,
            })
            .collect()
    }

    fn buy(index: usize, price: f64) -> Signal {
        Signal {
            index,
            timestamp: index as i64,
            price,
            action: Action::Buy,
            indicators: BTreeMap::new(),
            reason: "test".into(),
        }
    }

    #[test]
    fn untouched_currency_portfolio() {
        let portfolio = Portfolio::new(100_000.0, Goal::Currency, 0.0).unwrap();
        let perf = Performance::compute(&portfolio, 123.0);

        assert_relative_eq!(perf.initial_value, 100_000.0);
        assert_relative_eq!(perf.final_value, 100_000.0);
        assert_eq!(perf.profit, 0.0);
        assert_eq!(perf.return_pct, 0.0);
        assert_eq!(perf.trade_count, 0);
        assert_eq!(perf.final_metric.unit, "$");
        assert_eq!(perf.max_drawdown, 0.0);
    }

    #[test]
    fn profit_and_return_after_buy() {
        let mut portfolio = Portfolio::new(1_000.0, Goal::Currency, 0.0).unwrap();
        portfolio.execute(&buy(1, 100.0)).unwrap();
        let perf = Performance::compute(&portfolio, 110.0);

        assert_relative_eq!(perf.final_value, 1_100.0, epsilon = 1e-9);
        assert_relative_eq!(perf.profit, 100.0, epsilon = 1e-9);
        assert_relative_eq!(perf.return_pct, 10.0, epsilon = 1e-9);
        assert_eq!(perf.trade_count, 1);
    }

    #[test]
    fn accumulate_metric_in_units() {
        let portfolio = Portfolio::new(50_000.0, Goal::Accumulate, 50_000.0).unwrap();
        let perf = Performance::compute(&portfolio, 60_000.0);

        assert_relative_eq!(perf.final_metric.value, 1.0);
        assert_eq!(perf.final_metric.unit, "Assets");
        assert_relative_eq!(perf.final_value, 60_000.0);
        assert_relative_eq!(perf.return_pct, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn max_drawdown() {
        let curve = make_equity_curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        let (dd, _) = compute_drawdown(&curve);

        assert!((dd - (110.0 - 80.0) / 110.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_duration() {
        let curve = make_equity_curve(&[100.0, 110.0, 100.0, 90.0, 85.0, 95.0]);
        let (_, duration) = compute_drawdown(&curve);

        assert_eq!(duration, 4);
    }

    #[test]
    fn drawdown_empty_curve() {
        assert_eq!(compute_drawdown(&[]), (0.0, 0));
    }

    #[test]
    fn drawdown_monotonic_rise_is_zero() {
        let curve = make_equity_curve(&[1.0, 2.0, 3.0, 3.0, 4.0]);
        assert_eq!(compute_drawdown(&curve), (0.0, 0));
    }
}
