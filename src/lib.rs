//! Real-time 2D particle simulation core.
//!
//! Circular particles move under optional gravity inside a rectangular or
//! circular container. Every step, overlapping pairs are found by an exhaustive
//! pairwise scan and resolved immediately in index order: the pair is pushed
//! apart, their velocities are swapped and damped, their radii optionally grow
//! and their speeds are capped. The mean speed of the population is recorded
//! once per step into a bounded series.
//!
//! Drawing and windowing live outside this library; see the `collision_sim`
//! binary for a viewer and a headless runner.

pub mod boundary;
pub mod collision;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod kinematics;
pub mod particle;
pub mod simulation;
pub mod speed;
pub mod telemetry;

pub use collision::CollisionEvent;
pub use config::{Container, SimulationConfig};
pub use ensemble::{RunSummary, run_ensemble};
pub use error::{Error, Result};
pub use particle::{Particle, Rgb};
pub use simulation::{Simulation, StepOutcome};
pub use telemetry::TelemetrySeries;
