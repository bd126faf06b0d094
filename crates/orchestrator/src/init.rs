//! Seeded particle initialization.
//!
//! Particles start on an evenly spaced lattice visited in shuffled order
//! (so the initial array is not spatially sorted), with uniform random
//! velocities in [-1, 1) per axis. Identities are assigned 1..=N once and never
//! reused.

use kernel::Particle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the initial particle set for a box of side `size`.
///
/// Deterministic for a given `(num_parts, seed)` pair; every position lies
/// strictly inside the box with spacing that respects the constant-density
/// invariant (`size` must come from [`kernel::constants::box_size`]).
pub fn init_particles(num_parts: usize, seed: u64, size: f64) -> Vec<Particle> {
    if num_parts == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let sx = (num_parts as f64).sqrt().ceil() as usize;
    let sy = (num_parts + sx - 1) / sx;

    // Fisher-Yates draw without replacement over lattice slots.
    let mut shuffle: Vec<usize> = (0..num_parts).collect();

    let mut parts = Vec::with_capacity(num_parts);
    for i in 0..num_parts {
        let j = rng.random_range(0..num_parts - i);
        let k = shuffle[j];
        shuffle[j] = shuffle[num_parts - i - 1];

        // Spread lattice slots evenly to guarantee minimum spacing.
        let x = size * (1.0 + (k % sx) as f64) / (1 + sx) as f64;
        let y = size * (1.0 + (k / sx) as f64) / (1 + sy) as f64;

        parts.push(Particle {
            id: (i + 1) as u64,
            x,
            y,
            vx: rng.random_range(-1.0..1.0),
            vy: rng.random_range(-1.0..1.0),
            ax: 0.0,
            ay: 0.0,
        });
    }

    parts
}
