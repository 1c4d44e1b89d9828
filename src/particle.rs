use rand::Rng;

use crate::speed;

/// An 8-bit-per-channel RGB color, used only by whoever draws the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Muted color for freshly spawned particles: each channel in `0..200`.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        Rgb([
            rng.random_range(0..200),
            rng.random_range(0..200),
            rng.random_range(0..200),
        ])
    }

    /// Fully random color, each channel over `0..=255`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Rgb([rng.random(), rng.random(), rng.random()])
    }

    #[inline]
    pub fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.0[2]
    }
}

/// A circular body. Its identity is its index in the simulation's particle sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// x-coordinate of the center, in container space.
    pub x: f32,
    /// y-coordinate of the center (screen convention, +y points down).
    pub y: f32,
    /// Velocity in x, in units per step.
    pub vx: f32,
    /// Velocity in y, in units per step.
    pub vy: f32,
    /// Always > 0. Only ever grows.
    pub radius: f32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            radius,
            color: Rgb::WHITE,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Magnitude of the velocity vector.
    #[inline]
    pub fn speed(&self) -> f32 {
        speed::magnitude(self.vx, self.vy)
    }

    /// Euclidean distance between the two centers.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True when every field that feeds the step is a finite number and the radius is positive.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.vx, self.vy, self.radius]
            .iter()
            .all(|c| c.is_finite())
            && self.radius > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn speed_and_distance() {
        let a = Particle::new(0.0, 0.0, 3.0, 4.0, 1.0);
        let b = Particle::new(6.0, 8.0, 0.0, 0.0, 1.0);
        assert!((a.speed() - 5.0).abs() < 1e-6);
        assert!((a.distance_to(&b) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn spawn_colors_stay_muted() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let c = Rgb::spawn(&mut rng);
            assert!(c.r() < 200 && c.g() < 200 && c.b() < 200);
        }
    }

    #[test]
    fn malformed_particles_detected() {
        assert!(Particle::new(1.0, 1.0, 0.0, 0.0, 2.0).is_well_formed());
        assert!(!Particle::new(1.0, 1.0, 0.0, 0.0, 0.0).is_well_formed());
        assert!(!Particle::new(f32::NAN, 1.0, 0.0, 0.0, 2.0).is_well_formed());
    }
}
