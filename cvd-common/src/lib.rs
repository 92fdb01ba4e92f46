pub mod cell;
pub mod config;
pub mod error;
pub mod sim_params;
pub mod snapshot;
pub mod summary;

// Re-export key types for easier use by dependent crates
pub use cell::{Cell, Species};
pub use config::{
    GasConfig, InitialConditions, LatticeConfig, OutputConfig, SimulationConfig, StickingConfig,
    TimingConfig,
};
pub use error::ConfigError;
pub use sim_params::{SimParams, StickingCoefficients};
pub use snapshot::Snapshot;
pub use summary::{Census, Ratio, RunSummary};
