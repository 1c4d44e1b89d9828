//! Speed limiter. Called after every operation that changes a velocity, so that
//! `|v| <= max_speed` holds whenever a step returns.

use crate::particle::Particle;

#[inline]
pub fn magnitude(vx: f32, vy: f32) -> f32 {
    vx.hypot(vy)
}

/// Rescale the velocity to exactly `max_speed` if it is faster, keeping its direction.
///
/// Returns `true` when the velocity was clamped.
pub fn limit(p: &mut Particle, max_speed: f32) -> bool {
    let speed = magnitude(p.vx, p.vy);
    if speed > max_speed {
        let scale = max_speed / speed;
        p.vx *= scale;
        p.vy *= scale;
        true
    } else {
        false
    }
}
