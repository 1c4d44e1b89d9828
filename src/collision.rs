//! Exhaustive pairwise overlap detection and response.
//!
//! Pairs are visited in ascending `(i, j)` order with `i < j` and each overlap is
//! resolved on the spot, so later pairs in the same pass see the particles as
//! already moved by earlier ones. With three or more mutually overlapping
//! particles the result therefore depends on index order; that is intended.

use rand::Rng;

use crate::config::SimulationConfig;
use crate::particle::{Particle, Rgb};
use crate::speed;

/// Separating axis used when two centers coincide.
pub const FALLBACK_AXIS: (f32, f32) = (1.0, 0.0);

/// One resolved overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Step during which the collision was resolved.
    pub step: u64,
    /// Lower particle index.
    pub a: usize,
    /// Higher particle index.
    pub b: usize,
    /// Penetration depth `r_a + r_b - distance` before separation.
    pub depth: f32,
}

/// True when the two discs intersect: `distance < r_a + r_b`.
#[inline]
pub fn overlaps(a: &Particle, b: &Particle) -> bool {
    a.distance_to(b) < a.radius + b.radius
}

/// Resolve an overlapping pair in place and return the penetration depth.
///
/// Separates the pair symmetrically along the line of centers, swaps the
/// velocities scaled by `damping`, grows both radii by `growth`, recolors both
/// and finally re-applies the speed cap.
pub fn respond<R: Rng>(
    a: &mut Particle,
    b: &mut Particle,
    config: &SimulationConfig,
    rng: &mut R,
) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = dx.hypot(dy);
    let (ux, uy) = if distance > 0.0 {
        (dx / distance, dy / distance)
    } else {
        FALLBACK_AXIS
    };

    let depth = a.radius + b.radius - distance;
    let half = depth / 2.0;
    a.x -= ux * half;
    a.y -= uy * half;
    b.x += ux * half;
    b.y += uy * half;

    let (avx, avy) = (a.vx, a.vy);
    a.vx = b.vx * config.damping;
    a.vy = b.vy * config.damping;
    b.vx = avx * config.damping;
    b.vy = avy * config.damping;

    if config.growth > 0.0 {
        a.radius += config.growth;
        b.radius += config.growth;
    }

    a.color = Rgb::random(rng);
    b.color = Rgb::random(rng);

    speed::limit(a, config.max_speed);
    speed::limit(b, config.max_speed);

    depth
}

/// Scan every unordered pair once and resolve overlaps immediately.
///
/// Resolved collisions are appended to `events`; the number resolved is returned.
pub fn resolve_all<R: Rng>(
    particles: &mut [Particle],
    config: &SimulationConfig,
    rng: &mut R,
    step: u64,
    events: &mut Vec<CollisionEvent>,
) -> usize {
    let n = particles.len();
    let before = events.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = particles.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if !overlaps(a, b) {
                continue;
            }

            let depth = respond(a, b, config, rng);
            tracing::trace!(
                step,
                a = i,
                b = j,
                depth,
                speed_a = a.speed(),
                speed_b = b.speed(),
                "collision"
            );
            events.push(CollisionEvent {
                step,
                a: i,
                b: j,
                depth,
            });
        }
    }

    events.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn elastic() -> SimulationConfig {
        SimulationConfig {
            damping: 1.0,
            growth: 0.0,
            max_speed: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn touching_is_not_overlapping() {
        let a = Particle::new(0.0, 0.0, 0.0, 0.0, 5.0);
        let b = Particle::new(10.0, 0.0, 0.0, 0.0, 5.0);
        assert!(!overlaps(&a, &b));
        let c = Particle::new(9.9, 0.0, 0.0, 0.0, 5.0);
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn damped_swap() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = SimulationConfig {
            damping: 0.5,
            ..elastic()
        };
        let mut a = Particle::new(0.0, 0.0, 4.0, -2.0, 5.0);
        let mut b = Particle::new(8.0, 0.0, -6.0, 1.0, 5.0);
        respond(&mut a, &mut b, &cfg, &mut rng);
        assert_eq!((a.vx, a.vy), (-3.0, 0.5));
        assert_eq!((b.vx, b.vy), (2.0, -1.0));
    }

    #[test]
    fn separation_resolves_penetration() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut a = Particle::new(3.0, 4.0, 0.0, 0.0, 6.0);
        let mut b = Particle::new(6.0, 8.0, 0.0, 0.0, 4.0);
        let depth = respond(&mut a, &mut b, &elastic(), &mut rng);
        assert!((depth - 5.0).abs() < 1e-5);
        assert!(a.distance_to(&b) >= a.radius + b.radius - 1e-4);
    }

    #[test]
    fn coincident_centers_separate_along_x() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut a = Particle::new(50.0, 50.0, 1.0, 0.0, 5.0);
        let mut b = Particle::new(50.0, 50.0, -1.0, 0.0, 5.0);
        let depth = respond(&mut a, &mut b, &elastic(), &mut rng);
        assert_eq!(depth, 10.0);
        assert!(a.is_well_formed() && b.is_well_formed());
        assert_eq!((a.x, b.x), (45.0, 55.0));
        assert_eq!((a.y, b.y), (50.0, 50.0));
    }

    #[test]
    fn growth_and_cap_applied() {
        let mut rng = StdRng::seed_from_u64(4);
        let cfg = SimulationConfig {
            growth: 0.25,
            max_speed: 2.0,
            ..elastic()
        };
        let mut a = Particle::new(0.0, 0.0, 0.0, 0.0, 5.0);
        let mut b = Particle::new(9.0, 0.0, 30.0, 40.0, 5.0);
        respond(&mut a, &mut b, &cfg, &mut rng);
        assert_eq!((a.radius, b.radius), (5.25, 5.25));
        assert!((a.speed() - 2.0).abs() < 1e-5);
        assert_eq!(b.speed(), 0.0);
    }

    #[test]
    fn pairs_resolved_in_index_order() {
        // Three particles on a line, all overlapping their neighbours.
        let mut rng = StdRng::seed_from_u64(5);
        let mut particles = vec![
            Particle::new(0.0, 0.0, 1.0, 0.0, 5.0),
            Particle::new(8.0, 0.0, 2.0, 0.0, 5.0),
            Particle::new(16.0, 0.0, 3.0, 0.0, 5.0),
        ];
        let mut events = Vec::new();
        let n = resolve_all(&mut particles, &elastic(), &mut rng, 9, &mut events);
        assert_eq!(n, events.len());
        let pairs: Vec<(usize, usize)> = events.iter().map(|e| (e.a, e.b)).collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
        assert!(events.iter().all(|e| e.step == 9));
        // (0,1) swaps first, then (1,2) sees particle 1 already carrying 1.0.
        assert_eq!(pairs[0], (0, 1));
        assert_eq!(particles[0].vx, 2.0);
        assert_eq!(*pairs.last().unwrap(), (1, 2));
        assert_eq!(particles[2].vx, 1.0);
    }

    #[test]
    fn separated_pairs_produce_no_events() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut particles = vec![
            Particle::new(0.0, 0.0, 1.0, 0.0, 1.0),
            Particle::new(10.0, 0.0, 1.0, 0.0, 1.0),
        ];
        let before = particles.clone();
        let mut events = Vec::new();
        assert_eq!(resolve_all(&mut particles, &elastic(), &mut rng, 0, &mut events), 0);
        assert_eq!(particles, before);
    }
}
