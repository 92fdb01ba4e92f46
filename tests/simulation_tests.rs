//! Integration tests for the deposition engine.
//!
//! These check the behaviors every run must keep:
//! - solids are terminal, particles never merge, nothing leaves the lattice
//! - seeded runs are reproducible
//! - stagnation stays off during warm-up, then clears idle gas
//! - cross-species sticking wins over same-species sticking

use cvd_common::{Cell, Ratio, SimParams, SimulationConfig, StickingCoefficients};
use cvd_engine::{run, CvdSimulation, Lattice, SequenceSource};

fn sticking_off() -> StickingCoefficients {
    StickingCoefficients::uniform(0.0)
}

fn params(nx: usize, ny: usize, n_steps: u32) -> SimParams {
    SimParams {
        nx,
        ny,
        n_steps,
        seed: Some(2024),
        ..SimParams::default()
    }
}

#[test]
fn top_row_fills_with_gas_a_in_one_step() {
    let p = SimParams {
        influx_rate: 1.0,
        a_ratio: 1.0,
        sticking: sticking_off(),
        ..params(3, 3, 1)
    };
    let outcome = run(p).unwrap();

    assert!(outcome.lattice.row(0).iter().all(|&c| c == Cell::GasA));
    assert!(outcome.lattice.row(1).iter().all(|&c| c == Cell::Empty));
    assert!(outcome.lattice.row(2).iter().all(|&c| c == Cell::Empty));
    assert_eq!(outcome.summary.solid_a_count, 0);
    assert_eq!(outcome.summary.ratio_actual, Ratio::Undefined);
}

#[test]
fn single_row_gas_solidifies_on_arrival() {
    let p = SimParams {
        a_ratio: 1.0,
        sticking: StickingCoefficients { prob_a: 1.0, ..sticking_off() },
        ..params(1, 1, 1)
    };
    let mut sim = CvdSimulation::new(p).unwrap();
    let stats = sim.step().unwrap();

    assert_eq!(stats.injected, 1);
    assert_eq!(stats.solidified, 1);
    assert_eq!(sim.lattice().get(0, 0), Cell::SolidA);
}

#[test]
fn influx_does_not_overwrite_deposited_film() {
    let p = SimParams {
        a_ratio: 1.0,
        sticking: StickingCoefficients { prob_a: 1.0, ..sticking_off() },
        ..params(1, 4, 5)
    };
    let outcome = run(p).unwrap();
    assert!(outcome.lattice.row(0).iter().all(|&c| c == Cell::SolidA));
    assert_eq!(outcome.summary.solid_a_count, 4);
}

#[test]
fn boxed_in_particle_removed_once_warm_up_ends() {
    const MAX_IDLE: u32 = 3;
    let p = SimParams {
        influx_rate: 0.0,
        max_idle_steps: MAX_IDLE,
        sticking: sticking_off(),
        ..params(2, 1, MAX_IDLE + 2)
    };
    let mut sim = CvdSimulation::new(p).unwrap();
    sim.place(0, 0, Cell::GasA).unwrap();
    sim.place(1, 0, Cell::SolidA).unwrap();

    for step in 1..=MAX_IDLE {
        let stats = sim.step().unwrap();
        assert_eq!(stats.removed, 0, "removed during warm-up at step {step}");
        assert_eq!(sim.lattice().get(0, 0), Cell::GasA);
    }

    let stats = sim.step().unwrap();
    assert_eq!(stats.step, MAX_IDLE + 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(sim.lattice().get(0, 0), Cell::Empty);
    assert_eq!(sim.lattice().get(1, 0), Cell::SolidA);

    sim.step().unwrap();
    assert_eq!(sim.lattice().get(0, 0), Cell::Empty);
}

#[test]
fn warm_up_never_removes_anything() {
    let p = SimParams {
        max_idle_steps: 200,
        ..params(12, 12, 200)
    };
    let mut sim = CvdSimulation::new(p).unwrap();
    for _ in 0..200 {
        assert_eq!(sim.step().unwrap().removed, 0);
    }
}

#[test]
fn solids_never_change_once_committed() {
    let p = SimParams {
        sticking: StickingCoefficients::uniform(0.3),
        max_idle_steps: 10,
        ..params(20, 15, 150)
    };
    let mut sim = CvdSimulation::new(p).unwrap();
    let mut previous: Lattice = sim.lattice().clone();

    for _ in 0..150 {
        sim.step().unwrap();
        let current = sim.lattice();
        for (before, after) in previous.cells().iter().zip(current.cells()) {
            if before.is_solid() {
                assert_eq!(before, after);
            }
        }
        previous = current.clone();
    }
    assert!(previous.census().solid() > 0);
}

#[test]
fn transport_conserves_particles() {
    // No influx, no sticking, no stagnation: a merge or an out-of-bounds
    // write would change the particle count.
    let p = SimParams {
        influx_rate: 0.0,
        max_idle_steps: 1000,
        sticking: sticking_off(),
        ..params(10, 4, 40)
    };
    let mut sim = CvdSimulation::new(p).unwrap();
    let mut placed = 0;
    for i in 0..6 {
        for j in 0..4 {
            if (i + j) % 2 == 0 {
                let cell = if j % 2 == 0 { Cell::GasA } else { Cell::GasB };
                sim.place(i, j, cell).unwrap();
                placed += 1;
            }
        }
    }

    for _ in 0..40 {
        sim.step().unwrap();
        let census = sim.lattice().census();
        assert_eq!(census.gas(), placed);
        assert_eq!(census.solid(), 0);
    }
    // the top row has drained
    assert_eq!(sim.lattice().row(0).iter().filter(|c| c.is_gas()).count(), 0);
}

#[test]
fn sideways_offsets_on_single_column_never_move() {
    // With one column every +/-1 offset points off the lattice.
    let p = SimParams {
        influx_rate: 0.0,
        max_idle_steps: 1000,
        sticking: sticking_off(),
        ..params(30, 1, 20)
    };
    let rng = SequenceSource::new([], [-1, 1, -1, 1]).with_fallback(0.0, 1);
    let mut sim = CvdSimulation::with_source(p, rng).unwrap();
    sim.place(0, 0, Cell::GasA).unwrap();
    sim.place(10, 0, Cell::GasB).unwrap();
    let before = sim.lattice().clone();

    for _ in 0..20 {
        let stats = sim.step().unwrap();
        assert_eq!(stats.moved, 0);
        assert_eq!(sim.lattice(), &before);
    }
}

#[test]
fn single_column_film_grows_from_bottom() {
    let p = SimParams {
        sticking: StickingCoefficients::uniform(0.1),
        ..params(30, 1, 300)
    };
    let outcome = run(p).unwrap();
    let column: Vec<Cell> = outcome.lattice.rows().map(|row| row[0]).collect();

    // Every solid is supported by the bottom boundary through other solids.
    let film = column.iter().rev().take_while(|c| c.is_solid()).count();
    let solids = column.iter().filter(|c| c.is_solid()).count();
    assert!(film > 0);
    assert_eq!(film, solids);
}

#[test]
fn same_seed_same_film() {
    let p = params(25, 25, 300);
    let first = run(p.clone()).unwrap();
    let second = run(p).unwrap();
    assert_eq!(first.lattice, second.lattice);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn cross_species_neighbor_wins_over_same_species() {
    // GasA at (1,1) boxed in by a solid A floor, with solid B to its right.
    let setup = |sticking: StickingCoefficients| {
        let p = SimParams {
            influx_rate: 0.0,
            sticking,
            ..params(3, 3, 1)
        };
        let mut sim = CvdSimulation::with_source(p, SequenceSource::constant(0.5, 0)).unwrap();
        for j in 0..3 {
            sim.place(2, j, Cell::SolidA).unwrap();
        }
        sim.place(1, 2, Cell::SolidB).unwrap();
        sim.place(1, 1, Cell::GasA).unwrap();
        sim
    };

    let mut same_only = setup(StickingCoefficients { prob_aa: 1.0, ..sticking_off() });
    same_only.step().unwrap();
    assert_eq!(same_only.lattice().get(1, 1), Cell::GasA);

    let mut cross_only = setup(StickingCoefficients { prob_ab: 1.0, ..sticking_off() });
    cross_only.step().unwrap();
    assert_eq!(cross_only.lattice().get(1, 1), Cell::SolidA);
}

#[test]
fn summary_matches_final_lattice() {
    let outcome = run(params(30, 30, 400)).unwrap();
    let census = outcome.lattice.census();
    assert_eq!(outcome.summary.solid_a_count, census.solid_a);
    assert_eq!(outcome.summary.solid_b_count, census.solid_b);
    assert_eq!(outcome.summary.ratio_expected, Ratio::Defined(1.0));
    match outcome.summary.ratio_actual {
        Ratio::Defined(r) => assert_eq!(r, census.solid_a as f64 / census.solid_b as f64),
        Ratio::Undefined => assert_eq!(census.solid_b, 0),
    }
}

#[test]
fn toml_config_runs_end_to_end() {
    let config = SimulationConfig::from_toml_str(
        r#"
        [lattice]
        nx = 8
        ny = 6

        [timing]
        n_steps = 30
        max_idle_steps = 5

        [gas]
        a_ratio = 0.7

        [initial_conditions]
        seed = 3
        "#,
    )
    .unwrap();
    let params = config.validate().unwrap();
    let outcome = run(params).unwrap();
    assert_eq!(outcome.lattice.nx(), 8);
    assert_eq!(outcome.lattice.ny(), 6);
}

#[test]
fn invalid_config_names_field() {
    let config = SimulationConfig::from_toml_str("[lattice]\nny = 0\n").unwrap();
    let err = config.validate().unwrap_err();
    assert_eq!(err.field(), "ny");
    assert!(err.to_string().contains("ny"));
}
