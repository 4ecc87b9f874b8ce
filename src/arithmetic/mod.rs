//! Possibility arithmetic: numeric domains for non-negative path weights.
//!
//! A *possibility* is a value proportional to a probability. Each domain
//! stores it as an `f64` in its own representation and provides the handful
//! of operations the recurrences need. Values from different domains must
//! never be mixed without going through [`PossibilityArithmetic::poss2ln`].
//!
//! Implementations are zero-sized and stateless, so matrices hold one by
//! value and the compiler inlines every operation.

mod approximate;
mod log;
mod simple;

use std::fmt;
use std::str::FromStr;

pub use approximate::{LogApproximatePossibility, APPROXIMATE_TOLERANCE};
pub use log::LogPossibility;
pub use simple::{SimplePossibility, UNDERFLOW_LIMIT};

/// Numeric strategy for possibilities.
pub trait PossibilityArithmetic: fmt::Debug + Send + Sync {
    /// Additive identity.
    fn zero(&self) -> f64;

    /// Multiplicative identity.
    fn one(&self) -> f64;

    /// Product of two possibilities.
    fn multiply(&self, a: f64, b: f64) -> f64;

    /// Quotient of two possibilities.
    fn divide(&self, a: f64, b: f64) -> f64;

    /// Sum of two possibilities in probability space.
    fn add(&self, a: f64, b: f64) -> f64;

    /// Whether `a` is strictly greater than `b`.
    fn gt(&self, a: f64, b: f64) -> bool;

    /// Whether `v` is the additive identity.
    fn is_zero(&self, v: f64) -> bool {
        v == self.zero()
    }

    /// Whether `v` is a legal representation in this domain.
    fn is_valid(&self, v: f64) -> bool;

    /// Convert to a natural-log value.
    fn poss2ln(&self, v: f64) -> f64;

    /// Convert from a natural-log value.
    fn ln2poss(&self, ln: f64) -> f64;

    /// Convert from a probability.
    fn prob2poss(&self, p: f64) -> f64;

    /// Convert to a probability.
    fn poss2prob(&self, v: f64) -> f64;

    /// Whether `v` has lost enough precision that results are unreliable.
    fn underflow(&self, v: f64) -> bool;
}

/// Run-time selector for an arithmetic domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithmeticKind {
    /// [`LogPossibility`]
    Log,
    /// [`LogApproximatePossibility`]
    LogApproximate,
    /// [`SimplePossibility`]
    Simple,
}

impl ArithmeticKind {
    /// Shared instance of the selected domain.
    pub fn arithmetic(self) -> &'static dyn PossibilityArithmetic {
        match self {
            ArithmeticKind::Log => &LogPossibility,
            ArithmeticKind::LogApproximate => &LogApproximatePossibility,
            ArithmeticKind::Simple => &SimplePossibility,
        }
    }
}

impl FromStr for ArithmeticKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "log" => Ok(ArithmeticKind::Log),
            "approx" | "approximate" | "log-approximate" => Ok(ArithmeticKind::LogApproximate),
            "simple" | "linear" => Ok(ArithmeticKind::Simple),
            other => Err(format!("unknown arithmetic '{}'", other)),
        }
    }
}

impl fmt::Display for ArithmeticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithmeticKind::Log => "log",
            ArithmeticKind::LogApproximate => "approx",
            ArithmeticKind::Simple => "simple",
        };
        f.write_str(name)
    }
}
