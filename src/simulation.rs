use crate::grid::Lattice;
use crate::influx;
use crate::lattice_state::LatticeState;
use crate::random::{RandomSource, RngSource};
use crate::solidify;
use crate::stagnation;
use crate::transport;
use cvd_common::{Cell, ConfigError, RunSummary, SimParams, Snapshot};
use log::{debug, trace};
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation already terminated after {n_steps} steps")]
    Terminated { n_steps: u32 },

    #[error("cell ({row}, {col}) is outside the {nx}x{ny} lattice")]
    OutOfBounds { row: usize, col: usize, nx: usize, ny: usize },
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Buffers allocated, no step taken yet.
    Initializing,
    Stepping,
    /// All `n_steps` steps done; results are final.
    Terminated,
}

/// Per-step counters, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub step: u32,
    pub injected: usize,
    pub moved: usize,
    pub solidified: usize,
    pub removed: usize,
}

/// Final lattice plus the derived statistics of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub lattice: Lattice,
    pub summary: RunSummary,
}

/// Owns the configuration, the double-buffered lattice and the random source
/// of one deposition run.
pub struct CvdSimulation<R: RandomSource = RngSource<StdRng>> {
    params: SimParams,
    state: LatticeState,
    rng: R,
    /// Number of completed steps.
    current_step: u32,
}

impl CvdSimulation<RngSource<StdRng>> {
    /// Creates a run that draws from `StdRng`, seeded from `params.seed` when
    /// given and from the OS otherwise.
    pub fn new(params: SimParams) -> Result<Self, SimulationError> {
        let rng = RngSource::from_seed_option(params.seed);
        Self::with_source(params, rng)
    }
}

impl<R: RandomSource> CvdSimulation<R> {
    /// Creates a run drawing from `rng`. Fails before allocating anything if
    /// the parameters are invalid.
    pub fn with_source(params: SimParams, rng: R) -> Result<Self, SimulationError> {
        params.check()?;
        debug!(
            "Initializing {}x{} lattice for {} steps (warm-up {}, seed {:?}).",
            params.nx, params.ny, params.n_steps, params.max_idle_steps, params.seed
        );
        let state = LatticeState::new(params.nx, params.ny);
        Ok(Self {
            params,
            state,
            rng,
            current_step: 0,
        })
    }

    /// Sets a cell of the committed lattice, e.g. to lay down a substrate
    /// before the first step.
    pub fn place(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), SimulationError> {
        let lattice = &mut self.state.current;
        if !lattice.contains(row, col) {
            return Err(SimulationError::OutOfBounds {
                row,
                col,
                nx: lattice.nx(),
                ny: lattice.ny(),
            });
        }
        lattice.set(row, col, cell);
        Ok(())
    }

    /// Advances the lattice by one step:
    /// influx, transport, solidification, stagnation (after warm-up), commit.
    pub fn step(&mut self) -> Result<StepStats, SimulationError> {
        if self.phase() == Phase::Terminated {
            return Err(SimulationError::Terminated { n_steps: self.params.n_steps });
        }
        let step = self.current_step + 1;

        self.state.begin_step();

        // --- 1. Influx into row 0 ---
        let injected = influx::inject(&mut self.state.next, &self.params, &mut self.rng);

        // --- 2. Transport, bottom row first ---
        let moved = transport::advance(&mut self.state, &mut self.rng);

        // --- 3. Solidification on the updated next state ---
        let solidified =
            solidify::solidify(&mut self.state.next, &self.params.sticking, &mut self.rng);

        // --- 4. Stagnant gas removal ---
        let removed =
            stagnation::remove_stagnant(&mut self.state, step, self.params.max_idle_steps);

        // --- Commit: next becomes current, mask resets ---
        self.state.swap_buffers();
        self.current_step = step;

        let stats = StepStats {
            step,
            injected,
            moved,
            solidified,
            removed,
        };
        trace!(
            "Step {}/{}: injected {}, moved {}, solidified {}, removed {}",
            step,
            self.params.n_steps,
            injected,
            moved,
            solidified,
            removed
        );
        Ok(stats)
    }

    /// Runs the remaining steps, calling `hook(step, lattice)` after every
    /// `every`-th step (never when `every` is 0). The hook only observes.
    pub fn run_with_progress<F>(
        &mut self,
        every: u32,
        mut hook: F,
    ) -> Result<RunSummary, SimulationError>
    where
        F: FnMut(u32, &Lattice),
    {
        while self.phase() != Phase::Terminated {
            let stats = self.step()?;
            if every > 0 && stats.step % every == 0 {
                hook(stats.step, &self.state.current);
            }
        }
        let summary = self.summary();
        debug!(
            "Run finished after {} steps: solid A {}, solid B {}, ratio {}",
            self.current_step, summary.solid_a_count, summary.solid_b_count, summary.ratio_actual
        );
        Ok(summary)
    }

    /// Runs the remaining steps without a progress hook.
    pub fn run_to_end(&mut self) -> Result<RunSummary, SimulationError> {
        self.run_with_progress(0, |_, _| {})
    }

    /// Solid counts and ratios of the committed lattice.
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(&self.state.current.census(), self.params.a_ratio)
    }

    /// Snapshot of the committed lattice; cell codes only when asked for.
    pub fn snapshot(&self, include_cells: bool) -> Snapshot {
        let lattice = &self.state.current;
        Snapshot {
            step: self.current_step,
            nx: lattice.nx(),
            ny: lattice.ny(),
            census: lattice.census(),
            cells: include_cells.then(|| lattice.codes()),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.current_step == 0 {
            Phase::Initializing
        } else if self.current_step < self.params.n_steps {
            Phase::Stepping
        } else {
            Phase::Terminated
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.state.current
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn into_outcome(self) -> RunOutcome {
        let summary = self.summary();
        RunOutcome {
            lattice: self.state.current,
            summary,
        }
    }
}

/// Runs a full simulation with `StdRng` and returns the final lattice and
/// statistics.
pub fn run(params: SimParams) -> Result<RunOutcome, SimulationError> {
    let mut sim = CvdSimulation::new(params)?;
    sim.run_to_end()?;
    Ok(sim.into_outcome())
}
