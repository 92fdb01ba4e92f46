use crate::simulation::{run, SimulationError};
use cvd_common::{RunSummary, SimParams};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// Runs one independent simulation per seed in parallel. The `seed` in
/// `params` is ignored; results come back in seed order.
pub fn run_ensemble(
    params: &SimParams,
    seeds: &[u64],
) -> Result<Vec<RunSummary>, SimulationError> {
    params.check()?;
    debug!(
        "Running ensemble of {} seeds on {} threads.",
        seeds.len(),
        rayon::current_num_threads()
    );

    seeds
        .par_iter()
        .map(|&seed| {
            let params = SimParams {
                seed: Some(seed),
                ..params.clone()
            };
            run(params).map(|outcome| outcome.summary)
        })
        .collect()
}

/// Spread of the deposited A/B ratio across an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnsembleStats {
    pub runs: usize,
    /// Runs that deposited no solid B.
    pub undefined_ratios: usize,
    pub mean_ratio: Option<f64>,
    pub std_ratio: Option<f64>,
    pub mean_solid_a: f64,
    pub mean_solid_b: f64,
}

impl EnsembleStats {
    pub fn from_summaries(summaries: &[RunSummary]) -> Self {
        let runs = summaries.len();
        let ratios: Vec<f64> = summaries.iter().filter_map(|s| s.ratio_actual.value()).collect();

        let mean_ratio = mean(&ratios);
        // Sample standard deviation; needs at least two defined ratios.
        let std_ratio = match mean_ratio {
            Some(m) if ratios.len() > 1 => {
                let sum_sq = ratios.iter().map(|r| (r - m).powi(2)).sum::<f64>();
                let var = sum_sq / (ratios.len() - 1) as f64;
                Some(var.sqrt())
            }
            _ => None,
        };

        let solid_a: Vec<f64> = summaries.iter().map(|s| s.solid_a_count as f64).collect();
        let solid_b: Vec<f64> = summaries.iter().map(|s| s.solid_b_count as f64).collect();

        EnsembleStats {
            runs,
            undefined_ratios: runs - ratios.len(),
            mean_ratio,
            std_ratio,
            mean_solid_a: mean(&solid_a).unwrap_or(0.0),
            mean_solid_b: mean(&solid_b).unwrap_or(0.0),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
