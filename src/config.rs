//! Run configuration: container shape, forces, collision response and stopping rule.
//!
//! A [`SimulationConfig`] is fixed for the lifetime of a run. It can be built in
//! code (struct update syntax over [`Default`]) or loaded from a JSON file in
//! which every field is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ===================================================================================
// Default Constants
// ===================================================================================

pub const DEFAULT_NUM_PARTICLES: usize = 100;
pub const DEFAULT_WIDTH: f32 = 1000.0;
pub const DEFAULT_HEIGHT: f32 = 800.0;
pub const DEFAULT_RADIUS: f32 = 10.0;
pub const DEFAULT_GRAVITY: f32 = 0.5;
pub const DEFAULT_MAX_SPEED: f32 = 20.0;
pub const DEFAULT_DAMPING: f32 = 0.5;
pub const DEFAULT_GROWTH: f32 = 0.1;
pub const DEFAULT_TERMINATION_RADIUS: f32 = 50.0;
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 1000;

// ===================================================================================
// Container
// ===================================================================================

/// The closed region particles are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Container {
    /// Axis-aligned box spanning `[0, width] x [0, height]`.
    Rect { width: f32, height: f32 },
    /// Disc of `radius` around `(center_x, center_y)`.
    Circle {
        center_x: f32,
        center_y: f32,
        radius: f32,
    },
}

impl Container {
    /// Largest circle that fits the given rectangle, centered in it.
    pub fn inscribed_circle(width: f32, height: f32) -> Self {
        Container::Circle {
            center_x: width / 2.0,
            center_y: height / 2.0,
            radius: width.min(height) / 2.0,
        }
    }

    /// Width and height of the bounding box, used for drawing.
    pub fn extent(&self) -> (f32, f32) {
        match *self {
            Container::Rect { width, height } => (width, height),
            Container::Circle {
                center_x,
                center_y,
                radius,
            } => (center_x + radius, center_y + radius),
        }
    }

    /// Check the container itself and that a particle of `particle_radius` fits inside.
    pub fn check_fits(&self, particle_radius: f32) -> Result<()> {
        match *self {
            Container::Rect { width, height } => {
                if !positive(width) || !positive(height) {
                    return Err(invalid("container width and height must be finite and > 0"));
                }
                if 2.0 * particle_radius >= width.min(height) {
                    return Err(invalid(format!(
                        "radius {particle_radius} does not fit a {width}x{height} container"
                    )));
                }
            }
            Container::Circle {
                center_x,
                center_y,
                radius,
            } => {
                if !center_x.is_finite() || !center_y.is_finite() {
                    return Err(invalid("container center must be finite"));
                }
                if !positive(radius) {
                    return Err(invalid("container radius must be finite and > 0"));
                }
                if particle_radius >= radius {
                    return Err(invalid(format!(
                        "radius {particle_radius} does not fit a circle of radius {radius}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::Rect {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

// ===================================================================================
// Simulation Parameters
// ===================================================================================

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Population size. Fixed for the whole run.
    pub num_particles: usize,
    pub container: Container,
    /// Radius every particle starts with.
    pub initial_radius: f32,
    /// Added to `vy` every step; 0 disables gravity.
    pub gravity: f32,
    /// Speed cap enforced after every velocity change.
    pub max_speed: f32,
    /// Factor in (0, 1] applied to exchanged velocities. 1 is perfectly elastic.
    pub damping: f32,
    /// Radius increment for both particles of every collision; 0 disables growth.
    pub growth: f32,
    /// The run ends once any radius reaches this value. Must exceed `initial_radius`.
    /// `None` never ends on its own.
    pub termination_radius: Option<f32>,
    /// Maximum number of mean-speed samples kept.
    pub telemetry_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_particles: DEFAULT_NUM_PARTICLES,
            container: Container::default(),
            initial_radius: DEFAULT_RADIUS,
            gravity: DEFAULT_GRAVITY,
            max_speed: DEFAULT_MAX_SPEED,
            damping: DEFAULT_DAMPING,
            growth: DEFAULT_GROWTH,
            termination_radius: Some(DEFAULT_TERMINATION_RADIUS),
            telemetry_capacity: DEFAULT_TELEMETRY_CAPACITY,
        }
    }
}

impl SimulationConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.num_particles == 0 {
            return Err(invalid("num_particles must be > 0"));
        }
        if !positive(self.initial_radius) {
            return Err(invalid("initial_radius must be finite and > 0"));
        }
        self.container.check_fits(self.initial_radius)?;
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite"));
        }
        if !positive(self.max_speed) {
            return Err(invalid("max_speed must be finite and > 0"));
        }
        if !positive(self.damping) || self.damping > 1.0 {
            return Err(invalid("damping must be in (0, 1]"));
        }
        if !self.growth.is_finite() || self.growth < 0.0 {
            return Err(invalid("growth must be finite and >= 0"));
        }
        if let Some(t) = self.termination_radius {
            if !positive(t) {
                return Err(invalid("termination_radius must be finite and > 0"));
            }
            if t <= self.initial_radius {
                return Err(invalid(format!(
                    "termination_radius {t} must exceed initial_radius {}",
                    self.initial_radius
                )));
            }
        }
        if self.telemetry_capacity == 0 {
            return Err(invalid("telemetry_capacity must be > 0"));
        }
        Ok(())
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading simulation config");
        Self::from_json_str(&text)
    }
}

#[inline]
fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        SimulationConfig::default().validate()
    }

    #[test]
    fn zero_particles_rejected() {
        let cfg = SimulationConfig {
            num_particles: 0,
            ..Default::default()
        };
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("num_particles"));
    }

    #[test]
    fn non_positive_speed_cap_rejected() {
        for max_speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let cfg = SimulationConfig {
                max_speed,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "max_speed={max_speed}");
        }
    }

    #[test]
    fn damping_range_enforced() {
        for (damping, ok) in [(1.0, true), (0.25, true), (0.0, false), (1.5, false)] {
            let cfg = SimulationConfig {
                damping,
                ..Default::default()
            };
            assert_eq!(cfg.validate().is_ok(), ok, "damping={damping}");
        }
    }

    #[test]
    fn particle_must_fit_container() {
        let cfg = SimulationConfig {
            container: Container::Circle {
                center_x: 0.0,
                center_y: 0.0,
                radius: 5.0,
            },
            initial_radius: 5.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SimulationConfig {
            container: Container::Rect {
                width: 100.0,
                height: 15.0,
            },
            initial_radius: 8.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn termination_radius_must_exceed_initial_radius() {
        for (termination, ok) in [(10.0, false), (4.0, false), (10.5, true)] {
            let cfg = SimulationConfig {
                initial_radius: 10.0,
                termination_radius: Some(termination),
                ..Default::default()
            };
            assert_eq!(cfg.validate().is_ok(), ok, "termination_radius={termination}");
        }
    }

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let cfg = SimulationConfig::from_json_str(
            r#"{
                "num_particles": 12,
                "container": { "shape": "circle", "center_x": 0, "center_y": 0, "radius": 100 },
                "termination_radius": null
            }"#,
        )?;
        assert_eq!(cfg.num_particles, 12);
        assert_eq!(
            cfg.container,
            Container::Circle {
                center_x: 0.0,
                center_y: 0.0,
                radius: 100.0
            }
        );
        assert_eq!(cfg.termination_radius, None);
        assert_eq!(cfg.max_speed, DEFAULT_MAX_SPEED);
        Ok(())
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimulationConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn inscribed_circle_fits_rect() {
        let c = Container::inscribed_circle(1000.0, 800.0);
        assert_eq!(
            c,
            Container::Circle {
                center_x: 500.0,
                center_y: 400.0,
                radius: 400.0
            }
        );
        assert_eq!(c.extent(), (900.0, 800.0));
    }
}
