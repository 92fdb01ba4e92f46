use crate::error::ConfigError;
use crate::sim_params::{SimParams, StickingCoefficients};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Raw integer fields are signed so that negative values survive parsing and
// are reported by name during validation.

// Lattice dimensions
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LatticeConfig {
    #[serde(default = "default_dimension")]
    pub nx: i64, // depth (rows)
    #[serde(default = "default_dimension")]
    pub ny: i64, // width (columns)
}

// Step counts and recording cadence
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_n_steps")]
    pub n_steps: i64,
    #[serde(default = "default_max_idle_steps")]
    pub max_idle_steps: i64,
    /// Snapshot cadence used by the binary's progress hook.
    #[serde(default = "default_record_interval")]
    pub record_interval_steps: i64,
}

// Gas supply at the top row
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GasConfig {
    #[serde(default = "default_influx_rate")]
    pub influx_rate: f64,
    #[serde(default = "default_a_ratio")]
    pub a_ratio: f64,
}

// Sticking coefficients, one per capture situation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StickingConfig {
    #[serde(default = "default_sticking")]
    pub prob_a: f64,
    #[serde(default = "default_sticking")]
    pub prob_b: f64,
    #[serde(default = "default_sticking")]
    pub prob_ab: f64,
    #[serde(default = "default_sticking")]
    pub prob_ba: f64,
    #[serde(default = "default_sticking")]
    pub prob_aa: f64,
    #[serde(default = "default_sticking")]
    pub prob_bb: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct InitialConditions {
    /// Fixed seed for a reproducible run. Omit for an OS-seeded run.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    #[serde(default = "default_true")]
    pub save_final_film: bool,
    #[serde(default)]
    pub save_cells_in_snapshot: bool,
    pub format: Option<String>, // "json", "bincode", "messagepack"
}

/// Top-level run configuration, usually loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub sticking: StickingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the configuration from a TOML file. The result is not yet
    /// validated; call [`SimulationConfig::validate`] before running.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse TOML from '{}'", path_ref.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Converts the raw configuration into validated run parameters.
    pub fn validate(&self) -> Result<SimParams, ConfigError> {
        let nx = positive("nx", self.lattice.nx)?;
        let ny = positive("ny", self.lattice.ny)?;
        let n_steps = positive("n_steps", self.timing.n_steps)?;
        let max_idle_steps = non_negative("max_idle_steps", self.timing.max_idle_steps)?;
        positive("record_interval_steps", self.timing.record_interval_steps)?;

        let params = SimParams {
            nx: nx as usize,
            ny: ny as usize,
            n_steps,
            max_idle_steps,
            influx_rate: self.gas.influx_rate,
            a_ratio: self.gas.a_ratio,
            sticking: StickingCoefficients {
                prob_a: self.sticking.prob_a,
                prob_b: self.sticking.prob_b,
                prob_ab: self.sticking.prob_ab,
                prob_ba: self.sticking.prob_ba,
                prob_aa: self.sticking.prob_aa,
                prob_bb: self.sticking.prob_bb,
            },
            seed: self.initial_conditions.seed,
        };
        params.check()?;
        Ok(params)
    }

    /// Snapshot cadence, at least every step.
    pub fn record_interval(&self) -> u32 {
        self.timing.record_interval_steps.clamp(1, u32::MAX as i64) as u32
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::TooLarge { field, value })
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::TooLarge { field, value })
}

impl Default for LatticeConfig {
    fn default() -> Self {
        LatticeConfig {
            nx: default_dimension(),
            ny: default_dimension(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            n_steps: default_n_steps(),
            max_idle_steps: default_max_idle_steps(),
            record_interval_steps: default_record_interval(),
        }
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        GasConfig {
            influx_rate: default_influx_rate(),
            a_ratio: default_a_ratio(),
        }
    }
}

impl Default for StickingConfig {
    fn default() -> Self {
        let p = default_sticking();
        StickingConfig {
            prob_a: p,
            prob_b: p,
            prob_ab: p,
            prob_ba: p,
            prob_aa: p,
            prob_bb: p,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            save_snapshots: true,
            save_final_film: true,
            save_cells_in_snapshot: false,
            format: None,
        }
    }
}

// Defaults reproduce the reference 50x50 run
fn default_dimension() -> i64 {
    50
}

fn default_n_steps() -> i64 {
    750
}

fn default_max_idle_steps() -> i64 {
    25
}

fn default_record_interval() -> i64 {
    500
}

fn default_influx_rate() -> f64 {
    1.0
}

fn default_a_ratio() -> f64 {
    0.5
}

fn default_sticking() -> f64 {
    0.05
}

fn default_base_filename() -> String {
    "cvd_run".to_string()
}

fn default_true() -> bool {
    true
}
