//! Batches of independent runs.
//!
//! Every run owns its own [`Simulation`] and steps it sequentially; rayon only
//! spreads whole runs across worker threads.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::simulation::Simulation;

/// Summary of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: u64,
    pub collisions: u64,
    /// Last recorded mean speed, 0 if no step was taken.
    pub final_mean_speed: f32,
    pub max_radius: f32,
    pub terminated: bool,
}

impl RunSummary {
    fn from_simulation(seed: u64, sim: &Simulation) -> Self {
        Self {
            seed,
            steps: sim.steps(),
            collisions: sim.collision_count(),
            final_mean_speed: sim.telemetry().last().unwrap_or(0.0),
            max_radius: sim.max_radius(),
            terminated: sim.is_terminated(),
        }
    }
}

/// Run one simulation per seed, each until termination or `max_steps`.
///
/// Results come back in the same order as `seeds`.
pub fn run_ensemble(
    config: &SimulationConfig,
    seeds: &[u64],
    max_steps: u64,
) -> Result<Vec<RunSummary>> {
    config.validate()?;

    seeds
        .par_iter()
        .map(|&seed| run_one(config, seed, max_steps))
        .collect()
}

fn run_one(config: &SimulationConfig, seed: u64, max_steps: u64) -> Result<RunSummary> {
    let mut sim = Simulation::new(config.clone(), seed)?;
    sim.run(max_steps);
    tracing::debug!(
        seed,
        steps = sim.steps(),
        collisions = sim.collision_count(),
        "ensemble run finished"
    );
    Ok(RunSummary::from_simulation(seed, &sim))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SimulationConfig {
        SimulationConfig {
            num_particles: 30,
            ..Default::default()
        }
    }

    #[test]
    fn matches_sequential_runs() -> Result<()> {
        let seeds = [5, 6, 7, 8];
        let summaries = run_ensemble(&small(), &seeds, 150)?;
        assert_eq!(summaries.len(), seeds.len());
        for (summary, &seed) in summaries.iter().zip(&seeds) {
            assert_eq!(summary.seed, seed);
            let mut sim = Simulation::new(small(), seed)?;
            sim.run(150);
            assert_eq!(summary, &RunSummary::from_simulation(seed, &sim));
        }
        Ok(())
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = SimulationConfig {
            damping: 0.0,
            ..small()
        };
        assert!(run_ensemble(&cfg, &[1], 10).is_err());
    }

    #[test]
    fn empty_seed_list() -> Result<()> {
        assert!(run_ensemble(&small(), &[], 10)?.is_empty());
        Ok(())
    }
}
