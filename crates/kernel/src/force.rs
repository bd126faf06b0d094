//! Short-range repulsive force kernel.
//!
//! The force between two particles at distance r < cutoff has coefficient
//! `(1 - cutoff/r) / r^2 / mass`, applied along the separation vector; it
//! vanishes smoothly at the cutoff. Separations below `MIN_R` are clamped
//! so near-overlapping particles repel with a large but finite force.

use crate::constants::{CUTOFF, MASS, MIN_R};
use crate::grid::BinGrid;
use crate::particle::Particle;

/// Acceleration contribution on the particle at (px, py) from a neighbor
/// at (nx, ny). Returns zero at or beyond the cutoff.
#[inline]
pub fn pair_accel(px: f64, py: f64, nx: f64, ny: f64) -> (f64, f64) {
    let dx = nx - px;
    let dy = ny - py;
    let mut r2 = dx * dx + dy * dy;
    if r2 > CUTOFF * CUTOFF {
        return (0.0, 0.0);
    }
    // Clamp: no singularity from near-overlapping particles.
    r2 = r2.max(MIN_R * MIN_R);
    let r = r2.sqrt();
    let coef = (1.0 - CUTOFF / r) / r2 / MASS;
    (coef * dx, coef * dy)
}

/// Recompute accelerations for the first `owned_count` particles.
///
/// `particles` holds the unit's owned particles followed by this step's
/// ghosts; both act as force sources, but only owned particles accumulate
/// acceleration. Accelerations are reset before accumulation, never
/// carried across steps.
pub fn compute_forces(particles: &mut [Particle], owned_count: usize, grid: &BinGrid) {
    for i in 0..owned_count {
        let px = particles[i].x;
        let py = particles[i].y;
        let mut ax = 0.0;
        let mut ay = 0.0;
        grid.for_each_neighbor(i, particles, |j| {
            let (fx, fy) = pair_accel(px, py, particles[j].x, particles[j].y);
            ax += fx;
            ay += fy;
        });
        particles[i].ax = ax;
        particles[i].ay = ay;
    }
}
