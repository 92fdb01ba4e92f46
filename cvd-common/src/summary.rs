use serde::{Deserialize, Serialize};
use std::fmt;

/// Quotient that may be undefined because its denominator is zero.
///
/// A run that deposits no solid B is a legitimate outcome, so the actual
/// A/B ratio is reported as `Undefined` instead of a NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn of(numerator: f64, denominator: f64) -> Ratio {
        if denominator == 0.0 {
            Ratio::Undefined
        } else {
            Ratio::Defined(numerator / denominator)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Ratio::Defined(_))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{:.4}", v),
            Ratio::Undefined => f.write_str("undefined"),
        }
    }
}

/// Cell population of a lattice by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub empty: u64,
    pub gas_a: u64,
    pub gas_b: u64,
    pub solid_a: u64,
    pub solid_b: u64,
}

impl Census {
    pub fn merge(self, other: Census) -> Census {
        Census {
            empty: self.empty + other.empty,
            gas_a: self.gas_a + other.gas_a,
            gas_b: self.gas_b + other.gas_b,
            solid_a: self.solid_a + other.solid_a,
            solid_b: self.solid_b + other.solid_b,
        }
    }

    pub fn gas(&self) -> u64 {
        self.gas_a + self.gas_b
    }

    pub fn solid(&self) -> u64 {
        self.solid_a + self.solid_b
    }
}

/// Outcome of a completed run, handed to whatever presents the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub solid_a_count: u64,
    pub solid_b_count: u64,
    /// Configured A/B injection ratio.
    pub ratio_expected: Ratio,
    /// Deposited solid A / solid B.
    pub ratio_actual: Ratio,
}

impl RunSummary {
    pub fn new(census: &Census, a_ratio: f64) -> Self {
        Self {
            solid_a_count: census.solid_a,
            solid_b_count: census.solid_b,
            ratio_expected: Ratio::of(a_ratio, 1.0 - a_ratio),
            ratio_actual: Ratio::of(census.solid_a as f64, census.solid_b as f64),
        }
    }
}
