//! Stochastic two-species CVD deposition on a 2D lattice.
//!
//! Each step injects gas at row 0, moves every gas particle one row down with
//! lateral jitter, sticks gas to neighboring solids or the bottom boundary and,
//! after a warm-up, removes gas that failed to move.

pub mod ensemble;
pub mod grid;
pub mod influx;
pub mod lattice_state;
pub mod random;
pub mod simulation;
pub mod solidify;
pub mod stagnation;
pub mod transport;

pub use ensemble::{run_ensemble, EnsembleStats};
pub use grid::{Lattice, SolidNeighbors};
pub use lattice_state::{LatticeState, MovedMask};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use simulation::{run, CvdSimulation, Phase, RunOutcome, SimulationError, StepStats};

pub use cvd_common;
