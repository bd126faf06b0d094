//! Program constants shared by every component of the simulation.
//!
//! These values are fixed by the problem definition and must be used
//! verbatim: snapshot files produced with different constants are not
//! comparable.

/// Total number of simulation steps per run.
pub const NSTEPS: u32 = 1000;

/// A snapshot is collected every `SAVEFREQ` steps.
pub const SAVEFREQ: u32 = 10;

/// Average particle density; the box area scales linearly with N so that
/// density stays constant as the particle count grows.
pub const DENSITY: f64 = 0.0005;

/// Particle mass (all particles are identical).
pub const MASS: f64 = 0.01;

/// Interaction cutoff radius. Two particles farther apart than this exert
/// no force on each other.
pub const CUTOFF: f64 = 0.01;

/// Minimum separation used when evaluating the force kernel. Separations
/// below this are clamped so near-overlapping particles produce a large
/// but finite repulsion instead of a singularity.
pub const MIN_R: f64 = CUTOFF / 100.0;

/// Fixed integration timestep (seconds).
pub const DT: f64 = 0.0005;

/// Side length of the square simulation box for `num_parts` particles.
///
/// `size = sqrt(DENSITY * N)`, so the box grows with N at constant density.
pub fn box_size(num_parts: usize) -> f64 {
    (DENSITY * num_parts as f64).sqrt()
}
