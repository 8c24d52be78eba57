//! End-to-end tests of the domain: signal generation, portfolio accounting
//! and backtest results, plus property checks on the indicator ranges.

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use tradesim::domain::backtest::{run_backtest, BacktestConfig};
use tradesim::domain::error::TradesimError;
use tradesim::domain::indicator::rsi::calculate_rsi;
use tradesim::domain::indicator::stochastic::calculate_stochastic;
use tradesim::domain::indicator::williams_r::calculate_williams_r;
use tradesim::domain::portfolio::{Goal, Portfolio, AUTO_COVER_REASON};
use tradesim::domain::price::PriceSeries;
use tradesim::domain::signal::{generate_signals, Action, FIRST_BAR_REASON, NO_TRIGGER_REASON};
use tradesim::domain::strategy::StrategyKind;

mod portfolio_scenarios {
    use super::*;

    #[test]
    fn buy_then_sell_at_profit() {
        let mut p = Portfolio::new(1000.0, Goal::Currency, 100.0).unwrap();
        p.execute(&signal(1, 100.0, Action::Buy)).unwrap();
        assert_relative_eq!(p.asset_holding(), 10.0);
        assert_relative_eq!(p.cash(), 0.0);

        p.execute(&signal(2, 120.0, Action::Sell)).unwrap();
        assert_relative_eq!(p.cash(), 1200.0);
        assert_relative_eq!(p.asset_holding(), 0.0);
        assert_eq!(p.ledger().len(), 2);
    }

    #[test]
    fn short_then_cover_at_profit() {
        let mut p = Portfolio::new(1000.0, Goal::Currency, 100.0).unwrap();
        p.execute(&signal(1, 100.0, Action::Short)).unwrap();
        assert_relative_eq!(p.cash(), 2000.0);
        assert_relative_eq!(p.asset_holding(), -10.0);
        assert_relative_eq!(p.value_at(80.0), 1200.0);

        p.execute(&signal(2, 80.0, Action::Cover)).unwrap();
        assert_relative_eq!(p.cash(), 1200.0);
        assert_relative_eq!(p.asset_holding(), 0.0);
    }

    #[test]
    fn buy_while_short_covers_first() {
        let mut p = Portfolio::new(1000.0, Goal::Currency, 100.0).unwrap();
        p.execute(&signal(1, 100.0, Action::Short)).unwrap();
        let trades = p.execute(&signal(2, 80.0, Action::Buy)).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].action, Action::Cover);
        assert_eq!(trades[0].reason, AUTO_COVER_REASON);
        assert_eq!(trades[1].action, Action::Buy);
        assert_relative_eq!(trades[1].amount, 15.0);
    }

    #[test]
    fn redundant_actions_do_nothing() {
        let mut p = Portfolio::new(1000.0, Goal::Currency, 100.0).unwrap();
        p.execute(&signal(1, 100.0, Action::Sell)).unwrap();
        p.execute(&signal(2, 100.0, Action::Cover)).unwrap();
        p.execute(&signal(3, 100.0, Action::Buy)).unwrap();
        p.execute(&signal(4, 110.0, Action::Buy)).unwrap();
        assert_eq!(p.ledger().len(), 1);
    }

    #[test]
    fn invalid_price_rejected_without_side_effects() {
        let mut p = Portfolio::new(1000.0, Goal::Currency, 100.0).unwrap();
        let result = p.execute(&signal(3, f64::NAN, Action::Buy));
        assert!(matches!(result, Err(TradesimError::InvalidPrice { index: 3, .. })));
        assert_relative_eq!(p.cash(), 1000.0);
        assert!(p.ledger().is_empty());
    }
}

mod backtest_scenarios {
    use super::*;

    #[test]
    fn golden_cross_buys_the_jump() {
        let series = series_from(&jump_prices(30, 10));
        let result = run_backtest(&series, &BacktestConfig::default()).unwrap();

        let portfolio = result.portfolio.as_ref().unwrap();
        assert_eq!(portfolio.ledger().len(), 1);
        let trade = &portfolio.ledger()[0];
        assert_eq!(trade.action, Action::Buy);
        assert_eq!(trade.index, 30);
        assert_relative_eq!(trade.price, 200.0);

        let perf = result.performance.as_ref().unwrap();
        assert_relative_eq!(perf.final_value, 100_000.0);
        assert_eq!(perf.trade_count, 1);
    }

    #[test]
    fn window_limits_simulation() {
        let series = series_from(&jump_prices(30, 10));
        let config = BacktestConfig {
            days: 5,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&series, &config).unwrap();

        assert_eq!(result.signals.len(), 40);
        assert_eq!(result.window_start, 35);
        assert_eq!(result.simulated_signals().len(), 5);
        assert!(result.portfolio.unwrap().ledger().is_empty());
    }

    #[test]
    fn accumulate_goal_reports_units() {
        let series = series_from(&vec![100.0; 50]);
        let config = BacktestConfig {
            goal: Goal::Accumulate,
            initial_balance: 1000.0,
            days: 10,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&series, &config).unwrap();
        let perf = result.performance.unwrap();

        assert_relative_eq!(perf.final_metric.value, 10.0);
        assert_eq!(perf.final_metric.unit, "Assets");
        assert_relative_eq!(perf.initial_value, 1000.0);
    }

    #[test]
    fn empty_series_simulates_nothing() {
        let result = run_backtest(&PriceSeries::default(), &BacktestConfig::default()).unwrap();
        assert!(result.signals.is_empty());
        assert!(result.portfolio.is_none());
        assert!(result.performance.is_none());
    }

    #[test]
    fn every_strategy_runs_on_a_wave() {
        let series = series_from(&wave_prices(300));
        for kind in StrategyKind::ALL {
            let config = BacktestConfig {
                strategy: kind,
                allow_shorting: true,
                ..BacktestConfig::default()
            };
            let result = run_backtest(&series, &config).unwrap();
            let perf = result.performance.unwrap();
            assert!(perf.final_value.is_finite(), "{kind} produced a non-finite value");
            assert!((0.0..=1.0).contains(&perf.max_drawdown), "{kind}");
        }
    }

    #[test]
    fn rsi_trades_on_a_wave() {
        let signals = generate_signals(&series_from(&wave_prices(200)), StrategyKind::Rsi, false);
        assert!(signals.iter().any(|s| s.action == Action::Buy));
        assert!(signals.iter().any(|s| s.action == Action::Sell));
        assert!(!signals.iter().any(|s| matches!(s.action, Action::Short | Action::Cover)));
    }
}

/// Each rule family on a short hand-built series: which bars fire, with what
/// action and reason.
mod rule_families {
    use super::*;

    fn fired(prices: &[f64], kind: StrategyKind, allow_shorting: bool) -> Vec<(usize, Action, String)> {
        generate_signals(&series_from(prices), kind, allow_shorting)
            .into_iter()
            .filter(|s| s.action != Action::Hold)
            .map(|s| (s.index, s.action, s.reason))
            .collect()
    }

    fn hit(index: usize, action: Action, reason: &str) -> (usize, Action, String) {
        (index, action, reason.to_string())
    }

    /// 20 flat bars, then `tail`.
    fn flat_then(tail: &[f64]) -> Vec<f64> {
        let mut prices = vec![100.0; 20];
        prices.extend_from_slice(tail);
        prices
    }

    /// `count` bars falling by one from 114.
    fn falling(count: usize) -> Vec<f64> {
        (0..count).map(|i| 114.0 - i as f64).collect()
    }

    #[test]
    fn macd_line_crosses_signal_on_jump() {
        let mut prices = vec![100.0; 40];
        prices.extend([110.0; 3]);
        let reason = "MACD crossed above signal line";
        assert_eq!(fired(&prices, StrategyKind::Macd, false), vec![hit(40, Action::Buy, reason)]);
        assert_eq!(
            fired(&prices, StrategyKind::ShortMacd, false),
            vec![hit(40, Action::Cover, reason)]
        );
    }

    #[test]
    fn macd_snapshot_includes_histogram() {
        let mut prices = vec![100.0; 40];
        prices.push(110.0);
        let signals = generate_signals(&series_from(&prices), StrategyKind::Macd, false);
        let snap = &signals[40].indicators;
        let hist = snap["histogram"].unwrap();
        assert_relative_eq!(hist, snap["macd"].unwrap() - snap["signal"].unwrap());
        assert!(hist > 0.0);
    }

    #[test]
    fn short_rsi_covers_on_oversold_exit() {
        let mut prices = falling(15);
        prices.push(120.0);
        assert_eq!(
            fired(&prices, StrategyKind::ShortRsi, false),
            vec![hit(15, Action::Cover, "RSI crossed above 30 (oversold exit)")]
        );
    }

    #[test]
    fn williams_r_zone_exits() {
        let mut prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        prices.extend([100.0, 112.0]);
        assert_eq!(
            fired(&prices, StrategyKind::WilliamsR, false),
            vec![
                hit(14, Action::Sell, "Williams %R crossed below -20"),
                hit(15, Action::Buy, "Williams %R crossed above -80"),
            ]
        );
    }

    #[test]
    fn cci_zone_exits() {
        let mut prices = vec![100.0; 19];
        prices.extend([120.0, 100.0, 60.0, 100.0]);
        assert_eq!(
            fired(&prices, StrategyKind::Cci, false),
            vec![
                hit(20, Action::Sell, "CCI crossed below 100"),
                hit(22, Action::Buy, "CCI crossed above -100"),
            ]
        );
    }

    #[test]
    fn bollinger_band_breaks() {
        let lower_reason = "Price broke below lower Bollinger band";
        let drop = flat_then(&[50.0]);
        assert_eq!(
            fired(&drop, StrategyKind::Bollinger, false),
            vec![hit(20, Action::Buy, lower_reason)]
        );
        assert_eq!(
            fired(&drop, StrategyKind::ShortBollinger, false),
            vec![hit(20, Action::Cover, lower_reason)]
        );

        let spike = flat_then(&[150.0]);
        assert_eq!(
            fired(&spike, StrategyKind::Bollinger, true),
            vec![hit(20, Action::Short, "Price broke above upper Bollinger band")]
        );
    }

    #[test]
    fn mean_reversion_band_uses_current_average() {
        let prices = flat_then(&[94.0, 50.0]);
        let reason = "Price fell 5% below MA20";
        assert_eq!(
            fired(&prices, StrategyKind::MeanReversion, false),
            vec![hit(20, Action::Buy, reason), hit(21, Action::Buy, reason)]
        );

        let prices = flat_then(&[106.0, 150.0]);
        let reason = "Price rose 5% above MA20";
        assert_eq!(
            fired(&prices, StrategyKind::MeanReversion, false),
            vec![hit(20, Action::Sell, reason), hit(21, Action::Sell, reason)]
        );
    }

    #[test]
    fn donchian_breakouts() {
        assert_eq!(
            fired(&flat_then(&[101.0, 99.0]), StrategyKind::Donchian, false),
            vec![
                hit(20, Action::Buy, "Price broke above prior 20-bar high"),
                hit(21, Action::Sell, "Price broke below prior 20-bar low"),
            ]
        );
    }

    #[test]
    fn psar_flips() {
        let prices = [100.0, 101.0, 102.0, 103.0, 104.0, 90.0];
        assert_eq!(
            fired(&prices, StrategyKind::Psar, true),
            vec![
                hit(1, Action::Buy, "Price crossed above Parabolic SAR"),
                hit(5, Action::Short, "Price crossed below Parabolic SAR"),
            ]
        );
    }

    #[test]
    fn stochastic_cross_inside_oversold_zone() {
        let mut prices = falling(16);
        prices.extend([99.0, 99.0, 102.0]);
        assert_eq!(
            fired(&prices, StrategyKind::Stochastic, false),
            vec![hit(18, Action::Buy, "%K crossed above %D in oversold zone")]
        );
    }

    #[test]
    fn stochastic_cross_outside_zone_is_gated() {
        // %K jumps to 23.3, above the oversold gate, as it crosses %D
        let mut prices = falling(16);
        prices.extend([99.0, 99.0, 106.0]);
        let signals = generate_signals(&series_from(&prices), StrategyKind::Stochastic, false);
        assert!(signals.iter().all(|s| s.action == Action::Hold));
        assert_eq!(signals[18].reason, NO_TRIGGER_REASON);
        let k = signals[18].indicators["k"].unwrap();
        let d = signals[18].indicators["d"].unwrap();
        assert!(k > d && k > 20.0);
    }
}

fn price_vec(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1000.0, len)
}

proptest! {
    #[test]
    fn one_signal_per_bar(prices in price_vec(1..120), idx in 0usize..16) {
        let kind = StrategyKind::ALL[idx];
        let signals = generate_signals(&series_from(&prices), kind, true);
        prop_assert_eq!(signals.len(), prices.len());
        prop_assert_eq!(signals[0].action, Action::Hold);
        prop_assert_eq!(signals[0].reason.as_str(), FIRST_BAR_REASON);
        for (i, s) in signals.iter().enumerate() {
            prop_assert_eq!(s.index, i);
        }
    }

    #[test]
    fn rsi_stays_in_range(prices in price_vec(0..200)) {
        for v in calculate_rsi(&prices, 14).values.into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn williams_r_stays_in_range(prices in price_vec(0..200)) {
        for v in calculate_williams_r(&prices, 14).values.into_iter().flatten() {
            prop_assert!((-100.0 - 1e-9..=1e-9).contains(&v));
        }
    }

    #[test]
    fn stochastic_stays_in_range(prices in price_vec(0..200)) {
        let stoch = calculate_stochastic(&prices, 14, 3, 3);
        for v in stoch.k.values.into_iter().chain(stoch.d.values).flatten() {
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&v));
        }
    }

    #[test]
    fn buy_then_sell_at_same_price_keeps_cash(balance in 1.0f64..1e7, price in 0.01f64..1e5) {
        let mut p = Portfolio::new(balance, Goal::Currency, price).unwrap();
        p.execute(&signal(1, price, Action::Buy)).unwrap();
        p.execute(&signal(2, price, Action::Sell)).unwrap();
        prop_assert!((p.cash() - balance).abs() <= balance * 1e-9);
    }
}
