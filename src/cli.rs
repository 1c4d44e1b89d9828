use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use collision_sim::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use collision_sim::{Container, SimulationConfig};

#[derive(Debug, Parser)]
#[command(name = "collision_sim", version, about = "2D particle collision simulation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive viewer.
    #[cfg(feature = "gui")]
    View {
        #[command(flatten)]
        sim: SimArgs,
    },
    /// Run without a window until termination or the step limit.
    Run {
        #[command(flatten)]
        sim: SimArgs,
        /// Stop after this many steps even if the run has not terminated.
        #[arg(long, default_value_t = 10_000)]
        max_steps: u64,
        /// Write the mean-speed series to this JSON file.
        #[arg(long)]
        telemetry_out: Option<PathBuf>,
    },
    /// Run many independent seeds in parallel and print one line per run.
    Batch {
        #[command(flatten)]
        sim: SimArgs,
        /// Number of runs, seeded consecutively from `--seed`.
        #[arg(long, default_value_t = 8)]
        runs: u64,
        #[arg(long, default_value_t = 10_000)]
        max_steps: u64,
    },
}

/// Flags shared by every subcommand. Each one overrides the config file.
#[derive(Debug, Args)]
pub struct SimArgs {
    /// JSON configuration file; missing fields keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long)]
    pub particles: Option<usize>,
    #[arg(long)]
    pub gravity: Option<f32>,
    #[arg(long)]
    pub damping: Option<f32>,
    #[arg(long)]
    pub growth: Option<f32>,
    #[arg(long)]
    pub max_speed: Option<f32>,
    /// Use a circular container inscribed in the default window.
    #[arg(long)]
    pub circle: bool,
}

impl SimArgs {
    /// Build the final configuration: file (or defaults), then flag overrides.
    pub fn resolve(&self) -> collision_sim::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(n) = self.particles {
            config.num_particles = n;
        }
        if let Some(g) = self.gravity {
            config.gravity = g;
        }
        if let Some(d) = self.damping {
            config.damping = d;
        }
        if let Some(g) = self.growth {
            config.growth = g;
        }
        if let Some(s) = self.max_speed {
            config.max_speed = s;
        }
        if self.circle {
            config.container = Container::inscribed_circle(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        }
        config.validate()?;
        Ok(config)
    }
}
