//! The simulation state object and its per-frame step.
//!
//! A [`Simulation`] owns everything that changes during a run: the particle
//! sequence, the random generator used for colors, the collision counter and
//! the telemetry series. Independent instances share nothing.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boundary;
use crate::collision::{self, CollisionEvent};
use crate::config::{Container, SimulationConfig};
use crate::error::{Error, Result};
use crate::kinematics;
use crate::particle::{Particle, Rgb};
use crate::speed;
use crate::telemetry::{self, TelemetrySeries};

/// What happened during one call to [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Zero-based index of the step.
    pub step: u64,
    /// Collisions resolved during the step, in resolution order.
    pub collisions: Vec<CollisionEvent>,
    /// Mean particle speed after collision resolution.
    pub mean_speed: f32,
    /// True once the termination predicate has fired.
    pub terminated: bool,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    particles: Vec<Particle>,
    rng: StdRng,
    collisions: u64,
    steps: u64,
    telemetry: TelemetrySeries,
    terminated: bool,
}

impl Simulation {
    /// Create a run with randomized initial conditions drawn from `seed`.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a run with randomized initial conditions drawn from `rng`.
    ///
    /// Particles are scattered uniformly inside the container, inset by their
    /// radius. Each velocity component is `±1` or `±2`.
    pub fn with_rng(config: SimulationConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;

        let particles = (0..config.num_particles)
            .map(|_| spawn(&config, &mut rng))
            .collect();

        tracing::info!(
            particles = config.num_particles,
            container = ?config.container,
            "simulation initialised"
        );
        Ok(Self::assemble(config, particles, rng))
    }

    /// Create a run from explicit particles. The population is taken from `particles`
    /// and `initial_radius` from the smallest supplied radius.
    ///
    /// Every particle must fit the container on its own.
    pub fn from_particles(
        mut config: SimulationConfig,
        particles: Vec<Particle>,
        seed: u64,
    ) -> Result<Self> {
        if let Some(i) = particles.iter().position(|p| !p.is_well_formed()) {
            return Err(Error::InvalidConfig(format!(
                "particle {i} has a non-finite field or non-positive radius"
            )));
        }
        config.num_particles = particles.len();
        if let Some(smallest) = particles.iter().map(|p| p.radius).reduce(f32::min) {
            config.initial_radius = smallest;
        }
        config.validate()?;
        for (i, p) in particles.iter().enumerate() {
            config.container.check_fits(p.radius).map_err(|e| match e {
                Error::InvalidConfig(msg) => Error::InvalidConfig(format!("particle {i}: {msg}")),
                other => other,
            })?;
        }

        let mut particles = particles;
        for p in &mut particles {
            speed::limit(p, config.max_speed);
        }
        Ok(Self::assemble(config, particles, StdRng::seed_from_u64(seed)))
    }

    fn assemble(config: SimulationConfig, particles: Vec<Particle>, rng: StdRng) -> Self {
        let telemetry = TelemetrySeries::with_capacity(config.telemetry_capacity);
        Self {
            config,
            particles,
            rng,
            collisions: 0,
            steps: 0,
            telemetry,
            terminated: false,
        }
    }

    /// Advance one frame: integrate and contain every particle, resolve all
    /// overlapping pairs, record the mean speed, then check for termination.
    ///
    /// After termination the state is frozen and further calls change nothing.
    pub fn step(&mut self) -> StepOutcome {
        if self.terminated {
            return StepOutcome {
                step: self.steps,
                collisions: Vec::new(),
                mean_speed: telemetry::mean_speed(&self.particles),
                terminated: true,
            };
        }

        let step = self.steps;
        let SimulationConfig {
            gravity,
            max_speed,
            container,
            ..
        } = self.config;

        for p in &mut self.particles {
            kinematics::integrate(p, gravity);
            boundary::resolve(p, &container);
            speed::limit(p, max_speed);
        }

        let mut collisions = Vec::new();
        let resolved = collision::resolve_all(
            &mut self.particles,
            &self.config,
            &mut self.rng,
            step,
            &mut collisions,
        );
        self.collisions += resolved as u64;

        let mean_speed = telemetry::mean_speed(&self.particles);
        self.telemetry.record(mean_speed);
        self.steps += 1;

        if self.termination_reached() {
            self.terminated = true;
            tracing::info!(
                steps = self.steps,
                collisions = self.collisions,
                max_radius = self.max_radius(),
                "termination radius reached"
            );
        }

        StepOutcome {
            step,
            collisions,
            mean_speed,
            terminated: self.terminated,
        }
    }

    /// Step until termination or until `max_steps` steps have been taken in this
    /// call. Returns the number of steps taken.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let mut taken = 0;
        while taken < max_steps && !self.terminated {
            self.step();
            taken += 1;
        }
        taken
    }

    fn termination_reached(&self) -> bool {
        match self.config.termination_radius {
            Some(threshold) => self.particles.iter().any(|p| p.radius >= threshold),
            None => false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Total collisions resolved since the start of the run.
    pub fn collision_count(&self) -> u64 {
        self.collisions
    }

    pub fn telemetry(&self) -> &TelemetrySeries {
        &self.telemetry
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn max_radius(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| p.radius)
            .fold(0.0, f32::max)
    }
}

fn spawn(config: &SimulationConfig, rng: &mut StdRng) -> Particle {
    let r = config.initial_radius;
    let (x, y) = match config.container {
        Container::Rect { width, height } => (
            rng.random_range(r..(width - r)),
            rng.random_range(r..(height - r)),
        ),
        Container::Circle {
            center_x,
            center_y,
            radius,
        } => {
            // sqrt keeps the density uniform over the disc
            let rho = (radius - r) * rng.random::<f32>().sqrt();
            let angle = rng.random_range(0.0..(2.0 * PI));
            (center_x + rho * angle.cos(), center_y + rho * angle.sin())
        }
    };

    let vx = random_component(rng);
    let vy = random_component(rng);
    let mut p = Particle::new(x, y, vx, vy, r).with_color(Rgb::spawn(rng));
    speed::limit(&mut p, config.max_speed);
    p
}

fn random_component(rng: &mut StdRng) -> f32 {
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let magnitude = rng.random_range(1..=2) as f32;
    sign * magnitude
}
