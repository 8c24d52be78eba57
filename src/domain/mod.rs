//! Core domain types and logic.

pub mod error;
pub mod price;
pub mod indicator;
pub mod rule;
pub mod rule_eval;
pub mod strategy;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
