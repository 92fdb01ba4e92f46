use anyhow::{Context, Result};
use clap::Parser;
use cvd_common::{SimParams, SimulationConfig, Snapshot};
use cvd_engine::{run_ensemble, CvdSimulation, EnsembleStats, Lattice};
use log::{debug, error, info, trace, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed override for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many seeded simulations in parallel instead of a single run
    #[arg(long)]
    ensemble: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting CVD deposition engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.initial_conditions.seed = Some(seed);
    }
    let params = config.validate().context("Invalid configuration")?;
    debug!("Simulation Parameters: {:#?}", params);

    if let Some(runs) = args.ensemble {
        return run_ensemble_mode(&params, runs);
    }

    // --- Initialize Simulation ---
    let mut sim = CvdSimulation::new(params)?;
    let record_interval = config.record_interval();
    let include_cells = config.output.save_cells_in_snapshot;
    info!(
        "Lattice {}x{}, {} steps, recording every {} steps.",
        sim.params().nx,
        sim.params().ny,
        sim.params().n_steps,
        record_interval
    );

    // --- Simulation Loop ---
    let mut snapshots = vec![sim.snapshot(include_cells)];
    let n_steps = sim.params().n_steps;
    let start_time = Instant::now();

    sim.run_with_progress(1, |step, lattice| {
        if step % record_interval == 0 || step == n_steps {
            let census = lattice.census();
            info!(
                "Step [{}/{}] | Gas: {} | Solid A: {} | Solid B: {} | Elapsed: {:.2} s",
                step,
                n_steps,
                census.gas(),
                census.solid_a,
                census.solid_b,
                start_time.elapsed().as_secs_f64()
            );
            snapshots.push(Snapshot {
                step,
                nx: lattice.nx(),
                ny: lattice.ny(),
                census,
                cells: include_cells.then(|| lattice.codes()),
            });
        } else {
            trace!("Step [{}/{}] completed", step, n_steps);
        }
    })?;

    info!("Simulation finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());

    // --- Final solid distribution ---
    let summary = sim.summary();
    info!("Distribution of Solid A in the entire system: {}", summary.solid_a_count);
    info!("Distribution of Solid B in the entire system: {}", summary.solid_b_count);
    info!("Expected Ratio: {}, Actual Ratio: {}", summary.ratio_expected, summary.ratio_actual);
    if !summary.ratio_actual.is_defined() {
        warn!("No Solid B deposited; the actual A/B ratio is undefined.");
    }

    // --- Save Recorded Data ---
    let base = &config.output.base_filename;
    if config.output.save_snapshots {
        save_snapshots(&snapshots, base, config.output.format.as_deref().unwrap_or("json"))?;
    } else {
        info!("Skipping saving snapshots as per config.");
    }

    if config.output.save_final_film {
        let filename = format!("{}_film.csv", base);
        save_film_csv(&sim.lattice().film(), &filename)?;
        info!("Final film saved to {}", filename);
    } else {
        info!("Skipping saving final film as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

fn run_ensemble_mode(params: &SimParams, runs: u64) -> Result<()> {
    let base_seed = params.seed.unwrap_or(0);
    let seeds: Vec<u64> = (0..runs).map(|i| base_seed.wrapping_add(i)).collect();
    info!("Running ensemble of {} simulations from seed {}...", runs, base_seed);

    let start_time = Instant::now();
    let summaries = run_ensemble(params, &seeds)?;
    let stats = EnsembleStats::from_summaries(&summaries);

    info!("Ensemble finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());
    info!("Mean Solid A: {:.1}, Mean Solid B: {:.1}", stats.mean_solid_a, stats.mean_solid_b);
    match (stats.mean_ratio, stats.std_ratio) {
        (Some(mean), Some(std)) => info!("Actual Ratio: {:.4} +/- {:.4}", mean, std),
        (Some(mean), None) => info!("Actual Ratio: {:.4}", mean),
        _ => warn!("No run produced a defined A/B ratio."),
    }
    if stats.undefined_ratios > 0 {
        warn!("{} of {} runs deposited no Solid B.", stats.undefined_ratios, stats.runs);
    }
    Ok(())
}

fn create_writer(filename: &str) -> Result<BufWriter<File>> {
    let file = File::create(filename)
        .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
    Ok(BufWriter::new(file))
}

fn save_snapshots(snapshots: &[Snapshot], base: &str, format: &str) -> Result<()> {
    match format {
        "json" => {
            let filename = format!("{}_snapshots.json", base);
            let mut writer = create_writer(&filename)?;
            serde_json::to_writer(&mut writer, snapshots)
                .with_context(|| format!("Error writing snapshot JSON to '{}'", filename))?;
            writer.flush()?;
            info!("All snapshots saved to {}", filename);
        }
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base);
            let mut writer = create_writer(&filename)?;
            bincode::serialize_into(&mut writer, snapshots).with_context(|| {
                format!("Error serializing snapshots to bincode in '{}'", filename)
            })?;
            writer.flush()?;
            info!("All snapshots saved to {} (binary format)", filename);
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base);
            let mut writer = create_writer(&filename)?;
            rmp_serde::encode::write(&mut writer, snapshots).with_context(|| {
                format!("Error serializing snapshots to MessagePack in '{}'", filename)
            })?;
            writer.flush()?;
            info!("All snapshots saved to {} (MessagePack format)", filename);
        }
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            save_snapshots(snapshots, base, "json")?;
        }
    }
    Ok(())
}

/// Writes the lattice as one CSV record per row of cell codes.
fn save_film_csv(lattice: &Lattice, filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)
        .with_context(|| format!("Error creating CSV file '{}'", filename))?;
    for row in lattice.rows() {
        writer.write_record(row.iter().map(|c| c.code().to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
