//! Keeps particles inside their [`Container`].
//!
//! Both shapes reflect the velocity about the wall normal and move the particle
//! back so it touches the wall from inside. The speed cap is re-applied by the
//! caller afterwards.

use crate::config::Container;
use crate::particle::Particle;

/// Resolve `p` against `container`. Returns `true` if the particle was corrected.
pub fn resolve(p: &mut Particle, container: &Container) -> bool {
    match *container {
        Container::Rect { width, height } => resolve_rect(p, width, height),
        Container::Circle {
            center_x,
            center_y,
            radius,
        } => resolve_circle(p, center_x, center_y, radius),
    }
}

/// Axis-aligned box `[0, width] x [0, height]`.
///
/// Each axis is handled on its own, so a corner hit is two reflections in the
/// same call.
pub fn resolve_rect(p: &mut Particle, width: f32, height: f32) -> bool {
    let hit_x = reflect_axis(&mut p.x, &mut p.vx, p.radius, width);
    let hit_y = reflect_axis(&mut p.y, &mut p.vy, p.radius, height);
    hit_x || hit_y
}

fn reflect_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) -> bool {
    if *pos - radius < 0.0 {
        *pos = radius;
        *vel = -*vel;
        true
    } else if *pos + radius > extent {
        *pos = extent - radius;
        *vel = -*vel;
        true
    } else {
        false
    }
}

/// Disc of radius `container_radius` around `(cx, cy)`.
///
/// A particle sitting exactly on the center has no radial direction; the
/// outward normal then falls back to `+x`.
pub fn resolve_circle(p: &mut Particle, cx: f32, cy: f32, container_radius: f32) -> bool {
    let rx = p.x - cx;
    let ry = p.y - cy;
    let distance = rx.hypot(ry);
    if distance + p.radius <= container_radius {
        return false;
    }

    let overlap = distance + p.radius - container_radius;
    let (ux, uy) = if distance > 0.0 {
        (rx / distance, ry / distance)
    } else {
        (1.0, 0.0)
    };

    p.x -= ux * overlap;
    p.y -= uy * overlap;

    let v_dot_u = p.vx * ux + p.vy * uy;
    p.vx -= 2.0 * v_dot_u * ux;
    p.vy -= 2.0 * v_dot_u * uy;
    true
}
