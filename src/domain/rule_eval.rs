//! Rule evaluation engine.
//!
//! Evaluates rules against a price slice and the named indicator series of a
//! strategy plan.
//!
//! # Evaluation Semantics
//!
//! - Result is `None` when any operand the rule needs is undefined; callers
//!   treat that as "no signal"
//! - `CROSS_*`, `BREAKS_*` and the `*_THROUGH` level crossings need the
//!   previous index and are `None` at index 0
//! - `CROSS_*` compares both sides bar by bar; `*_THROUGH` holds the level at
//!   its current-bar value
//! - `ALL`: `Some(false)` as soon as one child is false, `None` if a child is
//!   undefined and none is false

use crate::domain::indicator::IndicatorSeries;
use crate::domain::rule::{Operand, Rule};
use std::collections::BTreeMap;

pub type NamedSeries = BTreeMap<&'static str, IndicatorSeries>;

pub fn evaluate(rule: &Rule, prices: &[f64], indicators: &NamedSeries, index: usize) -> Option<bool> {
    match rule {
        Rule::CrossAbove { left, right } => {
            let prev = index.checked_sub(1)?;
            let left_prev = resolve_operand(left, prices, indicators, prev)?;
            let right_prev = resolve_operand(right, prices, indicators, prev)?;
            let left_curr = resolve_operand(left, prices, indicators, index)?;
            let right_curr = resolve_operand(right, prices, indicators, index)?;
            Some(left_prev <= right_prev && left_curr > right_curr)
        }
        Rule::CrossBelow { left, right } => {
            let prev = index.checked_sub(1)?;
            let left_prev = resolve_operand(left, prices, indicators, prev)?;
            let right_prev = resolve_operand(right, prices, indicators, prev)?;
            let left_curr = resolve_operand(left, prices, indicators, index)?;
            let right_curr = resolve_operand(right, prices, indicators, index)?;
            Some(left_prev >= right_prev && left_curr < right_curr)
        }
        Rule::BreaksAbove { left, right } => {
            let prev = index.checked_sub(1)?;
            let right_prev = resolve_operand(right, prices, indicators, prev)?;
            let left_curr = resolve_operand(left, prices, indicators, index)?;
            Some(left_curr > right_prev)
        }
        Rule::BreaksBelow { left, right } => {
            let prev = index.checked_sub(1)?;
            let right_prev = resolve_operand(right, prices, indicators, prev)?;
            let left_curr = resolve_operand(left, prices, indicators, index)?;
            Some(left_curr < right_prev)
        }
        Rule::FallsThrough { left, level } => {
            let (left_prev, left_curr, level) = level_crossing(left, level, prices, indicators, index)?;
            Some(left_prev >= level && left_curr < level)
        }
        Rule::RisesThrough { left, level } => {
            let (left_prev, left_curr, level) = level_crossing(left, level, prices, indicators, index)?;
            Some(left_prev <= level && left_curr > level)
        }
        Rule::Above { left, right } => {
            let left_val = resolve_operand(left, prices, indicators, index)?;
            let right_val = resolve_operand(right, prices, indicators, index)?;
            Some(left_val > right_val)
        }
        Rule::Below { left, right } => {
            let left_val = resolve_operand(left, prices, indicators, index)?;
            let right_val = resolve_operand(right, prices, indicators, index)?;
            Some(left_val < right_val)
        }
        Rule::All(rules) => {
            let mut undefined = false;
            for r in rules {
                match evaluate(r, prices, indicators, index) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => undefined = true,
                }
            }
            if undefined { None } else { Some(true) }
        }
    }
}

/// `(left[i-1], left[i], level[i])`, or `None` unless `level` is also
/// defined at `i-1`.
fn level_crossing(
    left: &Operand,
    level: &Operand,
    prices: &[f64],
    indicators: &NamedSeries,
    index: usize,
) -> Option<(f64, f64, f64)> {
    let prev = index.checked_sub(1)?;
    resolve_operand(level, prices, indicators, prev)?;
    Some((
        resolve_operand(left, prices, indicators, prev)?,
        resolve_operand(left, prices, indicators, index)?,
        resolve_operand(level, prices, indicators, index)?,
    ))
}

pub fn resolve_operand(
    operand: &Operand,
    prices: &[f64],
    indicators: &NamedSeries,
    index: usize,
) -> Option<f64> {
    match operand {
        Operand::Price => prices.get(index).copied(),
        Operand::Constant(v) => Some(*v),
        Operand::Indicator(name) => indicators.get(name)?.get(index),
        Operand::Scaled { name, factor } => indicators.get(name)?.get(index).map(|v| v * factor),
    }
}
