use serde::Serialize;

use crate::particle::Particle;

/// Bounded, append-only series of per-step mean speeds.
///
/// Once full, further samples are dropped: the series is always a prefix of the
/// run, never a sliding window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySeries {
    samples: Vec<f32>,
    capacity: usize,
}

impl TelemetrySeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `mean_speed` if there is room. Returns `false` when the sample was dropped.
    pub fn record(&mut self, mean_speed: f32) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(mean_speed);
        true
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<f32> {
        self.samples.last().copied()
    }

    /// `[step, mean_speed]` pairs, ready to hand to a plotting surface.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v as f64])
            .collect()
    }
}

/// Arithmetic mean of the particle speeds; 0 for an empty slice.
pub fn mean_speed(particles: &[Particle]) -> f32 {
    if particles.is_empty() {
        return 0.0;
    }
    let total: f32 = particles.iter().map(Particle::speed).sum();
    total / particles.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_beyond_capacity() {
        let mut series = TelemetrySeries::with_capacity(3);
        for v in [1.0, 2.0, 3.0] {
            assert!(series.record(v));
        }
        assert!(series.is_full());
        assert!(!series.record(4.0));
        assert!(!series.record(5.0));
        assert_eq!(series.samples(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.last(), Some(3.0));
    }

    #[test]
    fn mean_of_speeds() {
        let particles = [
            Particle::new(0.0, 0.0, 3.0, 4.0, 1.0),
            Particle::new(0.0, 0.0, 0.0, 1.0, 1.0),
        ];
        assert!((mean_speed(&particles) - 3.0).abs() < 1e-6);
        assert_eq!(mean_speed(&[]), 0.0);
    }

    #[test]
    fn points_are_indexed_by_step() {
        let mut series = TelemetrySeries::with_capacity(8);
        series.record(2.5);
        series.record(1.5);
        assert_eq!(series.points(), vec![[0.0, 2.5], [1.0, 1.5]]);
    }
}
