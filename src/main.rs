//! Driver for the particle collision simulation: interactive viewer, headless
//! runner and parallel batch runner.

mod cli;
#[cfg(feature = "gui")]
mod viewer;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use collision_sim::{Simulation, SimulationConfig, run_ensemble};

use crate::cli::{Cli, Command};

// ===================================================================================
// main
// ===================================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        #[cfg(feature = "gui")]
        Command::View { sim } => {
            let config = sim.resolve().context("invalid simulation parameters")?;
            viewer::run(config, sim.seed)
        }
        Command::Run {
            sim,
            max_steps,
            telemetry_out,
        } => {
            let config = sim.resolve().context("invalid simulation parameters")?;
            run_headless(config, sim.seed, max_steps, telemetry_out.as_deref())
        }
        Command::Batch {
            sim,
            runs,
            max_steps,
        } => {
            let config = sim.resolve().context("invalid simulation parameters")?;
            run_batch(&config, sim.seed, runs, max_steps)
        }
    }
}

fn run_headless(
    config: SimulationConfig,
    seed: u64,
    max_steps: u64,
    telemetry_out: Option<&Path>,
) -> Result<()> {
    let mut sim = Simulation::new(config, seed)?;
    sim.run(max_steps);

    tracing::info!(
        steps = sim.steps(),
        collisions = sim.collision_count(),
        max_radius = sim.max_radius(),
        mean_speed = sim.telemetry().last().unwrap_or(0.0),
        terminated = sim.is_terminated(),
        "run finished"
    );

    if let Some(path) = telemetry_out {
        let json = serde_json::to_string_pretty(sim.telemetry())?;
        fs::write(path, json)
            .with_context(|| format!("writing telemetry to {}", path.display()))?;
        tracing::info!(path = %path.display(), samples = sim.telemetry().len(), "telemetry written");
    }
    Ok(())
}

fn run_batch(config: &SimulationConfig, first_seed: u64, runs: u64, max_steps: u64) -> Result<()> {
    // Whole runs are spread over the physical cores; each run stays single-threaded.
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get_physical())
        .build_global()
        .context("building the rayon thread pool")?;

    let seeds: Vec<u64> = (0..runs).map(|i| first_seed.wrapping_add(i)).collect();
    let summaries = run_ensemble(config, &seeds, max_steps)?;

    for s in &summaries {
        println!(
            "seed={} steps={} collisions={} mean_speed={:.3} max_radius={:.2} terminated={}",
            s.seed, s.steps, s.collisions, s.final_mean_speed, s.max_radius, s.terminated
        );
    }
    Ok(())
}
