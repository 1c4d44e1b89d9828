use crate::particle::Particle;

/// Advance one particle by a single fixed step (semi-implicit Euler).
///
/// Gravity is added to `vy` before the position moves, so the new velocity is
/// the one that gets integrated.
#[inline]
pub fn integrate(p: &mut Particle, gravity: f32) {
    p.vy += gravity;
    p.x += p.vx;
    p.y += p.vy;
}
