//! Configuration validation.
//!
//! Validates every config field before a run. Missing optional keys fall back
//! to defaults at the call site; present keys must parse and be in range.

use crate::domain::error::TradesimError;
use crate::domain::portfolio::Goal;
use crate::domain::strategy::{StrategyCatalog, StrategyKind};
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_initial_balance(config)?;
    validate_days(config)?;
    validate_warmup(config)?;
    validate_goal(config)?;
    validate_allow_shorting(config)?;
    validate_strategy(config)?;
    validate_prices_path(config)?;
    Ok(())
}

pub fn validate_synthetic_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if let Some(price) = parse_value::<f64>(config, "synthetic", "initial_price")? {
        if !(price.is_finite() && price > 0.0) {
            return Err(invalid("synthetic", "initial_price", "initial_price must be positive"));
        }
    }
    if let Some(drift) = parse_value::<f64>(config, "synthetic", "drift")? {
        if !drift.is_finite() {
            return Err(invalid("synthetic", "drift", "drift must be finite"));
        }
    }
    if let Some(vol) = parse_value::<f64>(config, "synthetic", "volatility")? {
        if !(vol.is_finite() && vol >= 0.0) {
            return Err(invalid(
                "synthetic",
                "volatility",
                "volatility must be non-negative",
            ));
        }
    }
    parse_value::<u64>(config, "synthetic", "seed")?;
    Ok(())
}

/// The strategies enabled by `[strategies] enabled`; every strategy when the
/// key is absent or empty.
pub fn strategy_catalog(config: &dyn ConfigPort) -> Result<StrategyCatalog, TradesimError> {
    let names = config.get_list("strategies", "enabled");
    if names.is_empty() {
        return Ok(StrategyCatalog::all());
    }
    StrategyCatalog::from_names(&names).map_err(|e| invalid("strategies", "enabled", &e.to_string()))
}

/// Parse `[section] key` strictly: `Ok(None)` when absent, `ConfigInvalid`
/// when present but malformed.
pub fn parse_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, TradesimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(section, key, &format!("cannot parse '{}'", raw.trim()))),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradesimError {
    TradesimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match parse_value::<f64>(config, "backtest", "initial_balance")? {
        Some(value) if !(value.is_finite() && value > 0.0) => Err(invalid(
            "backtest",
            "initial_balance",
            "initial_balance must be positive",
        )),
        _ => Ok(()),
    }
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match parse_value::<usize>(config, "backtest", "days")? {
        Some(0) => Err(invalid("backtest", "days", "days must be at least 1")),
        _ => Ok(()),
    }
}

fn validate_warmup(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    parse_value::<usize>(config, "backtest", "warmup")?;
    Ok(())
}

fn validate_goal(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    parse_value::<Goal>(config, "backtest", "goal")?;
    Ok(())
}

fn validate_allow_shorting(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("backtest", "allow_shorting") {
        Some(raw) if parse_bool(&raw).is_none() => Err(invalid(
            "backtest",
            "allow_shorting",
            "expected true/false, yes/no or 1/0",
        )),
        _ => Ok(()),
    }
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let catalog = strategy_catalog(config)?;
    let Some(kind) = parse_value::<StrategyKind>(config, "backtest", "strategy")? else {
        return Ok(());
    };
    if !catalog.enabled().contains(&kind) {
        return Err(invalid(
            "backtest",
            "strategy",
            &format!("strategy '{}' is not listed in [strategies] enabled", kind),
        ));
    }
    Ok(())
}

fn validate_prices_path(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("backtest", "prices") {
        Some(path) if path.trim().is_empty() => Err(TradesimError::ConfigMissing {
            section: "backtest".to_string(),
            key: "prices".to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
