//! Rule AST data structures.
//!
//! This module defines the abstract syntax tree for signal rules:
//! - `Operand`: What can be compared (price, constants, named indicators)
//! - `Rule`: crossing, breakout, comparison and conjunction variants
//!
//! Every strategy is a pair of rules (bullish, bearish) over the same set of
//! named indicator series; see [`crate::domain::strategy`].

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Price,
    Constant(f64),
    /// A named indicator series of the current strategy plan.
    Indicator(&'static str),
    /// A named indicator series multiplied by a constant factor.
    Scaled { name: &'static str, factor: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `left[i-1] <= right[i-1] && left[i] > right[i]`
    CrossAbove { left: Operand, right: Operand },
    /// `left[i-1] >= right[i-1] && left[i] < right[i]`
    CrossBelow { left: Operand, right: Operand },
    /// `left[i] > right[i-1]`
    BreaksAbove { left: Operand, right: Operand },
    /// `left[i] < right[i-1]`
    BreaksBelow { left: Operand, right: Operand },
    /// `left[i-1] >= level[i] && left[i] < level[i]`. The level is read at the
    /// current bar only, but must also be defined at the previous one.
    FallsThrough { left: Operand, level: Operand },
    /// `left[i-1] <= level[i] && left[i] > level[i]`
    RisesThrough { left: Operand, level: Operand },
    Above { left: Operand, right: Operand },
    Below { left: Operand, right: Operand },
    All(Vec<Rule>),
}

impl Rule {
    pub fn cross_above(left: Operand, right: Operand) -> Self {
        Rule::CrossAbove { left, right }
    }

    pub fn cross_below(left: Operand, right: Operand) -> Self {
        Rule::CrossBelow { left, right }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Price => write!(f, "price"),
            Operand::Constant(v) => write!(f, "{}", v),
            Operand::Indicator(name) => write!(f, "{}", name),
            Operand::Scaled { name, factor } => write!(f, "{}*{}", name, factor),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::CrossAbove { left, right } => write!(f, "CROSS_ABOVE({}, {})", left, right),
            Rule::CrossBelow { left, right } => write!(f, "CROSS_BELOW({}, {})", left, right),
            Rule::BreaksAbove { left, right } => write!(f, "BREAKS_ABOVE({}, {})", left, right),
            Rule::BreaksBelow { left, right } => write!(f, "BREAKS_BELOW({}, {})", left, right),
            Rule::FallsThrough { left, level } => write!(f, "FALLS_THROUGH({}, {})", left, level),
            Rule::RisesThrough { left, level } => write!(f, "RISES_THROUGH({}, {})", left, level),
            Rule::Above { left, right } => write!(f, "ABOVE({}, {})", left, right),
            Rule::Below { left, right } => write!(f, "BELOW({}, {})", left, right),
            Rule::All(rules) => {
                write!(f, "ALL(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                write!(f, ")")
            }
        }
    }
}
