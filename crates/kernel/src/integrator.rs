//! Fixed-step explicit integration with reflective walls.
//!
//! Velocity updates before position, every step, so acceleration computed
//! from positions alone stays consistent with a semi-implicit scheme.

use crate::constants::DT;
use crate::particle::Particle;

/// Advance one particle by one timestep and bounce it off the box walls.
///
/// Reflection mirrors the overshoot back into `[0, size]` and flips the
/// corresponding velocity component (elastic, no energy loss). The loop
/// handles arbitrary overshoot, not just a single wall crossing.
#[inline]
pub fn advance_particle(p: &mut Particle, size: f64) {
    p.vx += p.ax * DT;
    p.vy += p.ay * DT;
    p.x += p.vx * DT;
    p.y += p.vy * DT;

    while p.x < 0.0 || p.x > size {
        p.x = if p.x < 0.0 { -p.x } else { 2.0 * size - p.x };
        p.vx = -p.vx;
    }
    while p.y < 0.0 || p.y > size {
        p.y = if p.y < 0.0 { -p.y } else { 2.0 * size - p.y };
        p.vy = -p.vy;
    }
}

/// Advance every particle in the slice.
pub fn advance(particles: &mut [Particle], size: f64) {
    for p in particles {
        advance_particle(p, size);
    }
}
