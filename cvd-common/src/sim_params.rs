use crate::cell::Species;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Sticking coefficients: probability that a gas particle turns solid in one
/// step given its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickingCoefficients {
    /// Capture of gas A on the bottom boundary row.
    pub prob_a: f64,
    /// Capture of gas B on the bottom boundary row.
    pub prob_b: f64,
    /// Gas A next to solid B.
    pub prob_ab: f64,
    /// Gas B next to solid A.
    pub prob_ba: f64,
    /// Gas A next to solid A.
    pub prob_aa: f64,
    /// Gas B next to solid B.
    pub prob_bb: f64,
}

impl StickingCoefficients {
    /// Same value for all six coefficients.
    pub fn uniform(p: f64) -> Self {
        Self {
            prob_a: p,
            prob_b: p,
            prob_ab: p,
            prob_ba: p,
            prob_aa: p,
            prob_bb: p,
        }
    }

    #[inline]
    pub fn boundary(&self, species: Species) -> f64 {
        match species {
            Species::A => self.prob_a,
            Species::B => self.prob_b,
        }
    }

    /// Capture of `species` gas next to a solid of the other species.
    #[inline]
    pub fn cross(&self, species: Species) -> f64 {
        match species {
            Species::A => self.prob_ab,
            Species::B => self.prob_ba,
        }
    }

    /// Capture of `species` gas next to a solid of its own species.
    #[inline]
    pub fn same(&self, species: Species) -> f64 {
        match species {
            Species::A => self.prob_aa,
            Species::B => self.prob_bb,
        }
    }

    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("prob_a", self.prob_a),
            ("prob_b", self.prob_b),
            ("prob_ab", self.prob_ab),
            ("prob_ba", self.prob_ba),
            ("prob_aa", self.prob_aa),
            ("prob_bb", self.prob_bb),
        ]
    }
}

impl Default for StickingCoefficients {
    fn default() -> Self {
        Self::uniform(0.05)
    }
}

/// Validated run parameters. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // Lattice
    pub nx: usize, // depth, rows; deposition runs toward row nx - 1
    pub ny: usize, // width, columns

    // Time
    pub n_steps: u32,
    pub max_idle_steps: u32, // warm-up before stagnant gas is removed

    // Gas supply
    pub influx_rate: f64, // per column per step
    pub a_ratio: f64,     // fraction of injected particles that are species A

    pub sticking: StickingCoefficients,

    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl SimParams {
    #[inline]
    pub fn b_ratio(&self) -> f64 {
        1.0 - self.a_ratio
    }

    /// Checks every field; fails on the first offending one.
    /// `nx * ny`, or `None` when the lattice could not be allocated.
    pub fn cell_count(&self) -> Option<usize> {
        self.nx
            .checked_mul(self.ny)
            .filter(|&cells| cells <= isize::MAX as usize)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.nx == 0 {
            return Err(ConfigError::NonPositive { field: "nx", value: 0 });
        }
        if self.ny == 0 {
            return Err(ConfigError::NonPositive { field: "ny", value: 0 });
        }
        // Cells are one byte each; a Vec can hold at most isize::MAX bytes.
        if self.cell_count().is_none() {
            return Err(ConfigError::TooLarge {
                field: "ny",
                value: i64::try_from(self.ny).unwrap_or(i64::MAX),
            });
        }
        if self.n_steps == 0 {
            return Err(ConfigError::NonPositive { field: "n_steps", value: 0 });
        }
        for (field, value) in self.sticking.named() {
            check_probability(field, value)?;
        }
        check_probability("influx_rate", self.influx_rate)?;
        check_probability("a_ratio", self.a_ratio)?;
        Ok(())
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            nx: 50,
            ny: 50,
            n_steps: 750,
            max_idle_steps: 25,
            influx_rate: 1.0,
            a_ratio: 0.5,
            sticking: StickingCoefficients::default(),
            seed: None,
        }
    }
}

// NaN fails the range check as well.
fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}
