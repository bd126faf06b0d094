//! Short-range N-body simulation kernel.
//!
//! This crate is the compute core: it owns no I/O and no cross-unit
//! communication. It advances one unit's resident particles through the
//! per-step pipeline:
//!
//! 1. Spatial index rebuild (owned + ghost particles)
//! 2. Force evaluation (short-range repulsion within the cutoff)
//! 3. Integration (fixed explicit step, reflective walls)
//!
//! # Modules
//! - [`particle`] -- particle records, ghost wire form, byte codecs.
//! - [`constants`] -- the fixed physical constants of the problem.
//! - [`grid`] -- cutoff-sized uniform bin grid for neighbor search.
//! - [`force`] -- pairwise repulsive force kernel.
//! - [`integrator`] -- explicit time advancement and wall reflection.

#![warn(missing_docs)]

pub mod constants;
pub mod force;
pub mod grid;
pub mod integrator;
pub mod particle;

pub use grid::{bin_row, num_rows, BinGrid};
pub use particle::{GhostParticle, Particle, ParticleTag};

/// Per-unit simulation state: the owned particle set, this step's ghost
/// replicas, and the spatial index over both.
///
/// Invariant: `parts[..owned]` are owned (integrated, migrated), the tail
/// holds ghosts (read-only, rebuilt every step). The two are kept in one
/// buffer so the force loop is uniform over owned and ghost sources.
pub struct LocalKernel {
    parts: Vec<Particle>,
    owned: usize,
    grid: BinGrid,
    size: f64,
}

impl LocalKernel {
    /// Create a kernel owning `particles`, in a box of side `size`.
    ///
    /// The grid covers the whole box rather than just this unit's strip,
    /// so boundary bins index ghost particles without remapping.
    pub fn new(particles: Vec<Particle>, size: f64) -> Self {
        let owned = particles.len();
        tracing::debug!("local kernel initialized: {} particles, box {}", owned, size);
        Self {
            parts: particles,
            owned,
            grid: BinGrid::new(size),
            size,
        }
    }

    /// Owned particles (never includes ghosts).
    pub fn owned(&self) -> &[Particle] {
        &self.parts[..self.owned]
    }

    /// Number of owned particles.
    pub fn owned_count(&self) -> usize {
        self.owned
    }

    /// Ownership tag of index `i` in the combined particle view.
    pub fn tag(&self, i: usize) -> ParticleTag {
        if i < self.owned {
            ParticleTag::Owned
        } else {
            ParticleTag::Ghost
        }
    }

    /// Replace this step's ghost set. Stale ghosts from the previous step
    /// are discarded; owned particles are untouched.
    pub fn set_ghosts<I: IntoIterator<Item = Particle>>(&mut self, ghosts: I) {
        self.parts.truncate(self.owned);
        self.parts.extend(ghosts);
    }

    /// Advance owned particles by one timestep.
    ///
    /// Rebuilds the spatial index over owned + ghost particles, recomputes
    /// accelerations for owned particles, then integrates and reflects
    /// them. Ghosts are force sources only; they are never mutated.
    pub fn step(&mut self) {
        self.grid.rebuild(&self.parts);
        force::compute_forces(&mut self.parts, self.owned, &self.grid);
        integrator::advance(&mut self.parts[..self.owned], self.size);
    }

    /// Remove and return owned particles for which `still_mine` is false.
    ///
    /// Called after integration: a particle that crossed out of this
    /// unit's strip must move to its new owner. Stale ghosts are dropped
    /// here as well -- they are rebuilt before the next force evaluation.
    pub fn extract_departed<F>(&mut self, still_mine: F) -> Vec<Particle>
    where
        F: Fn(&Particle) -> bool,
    {
        self.parts.truncate(self.owned);
        let mut departed = Vec::new();
        let mut i = 0;
        while i < self.parts.len() {
            if still_mine(&self.parts[i]) {
                i += 1;
            } else {
                departed.push(self.parts.swap_remove(i));
            }
        }
        self.owned = self.parts.len();
        departed
    }

    /// Take ownership of particles that migrated into this unit's strip.
    pub fn accept_arrivals<I: IntoIterator<Item = Particle>>(&mut self, arrivals: I) {
        self.parts.truncate(self.owned);
        self.parts.extend(arrivals);
        self.owned = self.parts.len();
    }

    /// Consume the kernel, returning the owned particle set.
    pub fn into_owned(mut self) -> Vec<Particle> {
        self.parts.truncate(self.owned);
        self.parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CUTOFF;

    fn part(id: u64, x: f64, y: f64) -> Particle {
        Particle { id, x, y, vx: 0.0, vy: 0.0, ax: 0.0, ay: 0.0 }
    }

    #[test]
    fn ghosts_are_tagged_and_dropped_on_refresh() {
        let mut k = LocalKernel::new(vec![part(1, 0.05, 0.05)], 0.1);
        k.set_ghosts(vec![part(2, 0.05, 0.06)]);
        assert_eq!(k.tag(0), ParticleTag::Owned);
        assert_eq!(k.tag(1), ParticleTag::Ghost);
        assert_eq!(k.owned().len(), 1);

        k.set_ghosts(Vec::new());
        assert_eq!(k.owned_count(), 1);
    }

    #[test]
    fn extract_departed_preserves_total() {
        let mut k = LocalKernel::new(
            vec![part(1, 0.01, 0.01), part(2, 0.05, 0.09), part(3, 0.02, 0.02)],
            0.1,
        );
        let gone = k.extract_departed(|p| p.y < 0.05);
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].id, 2);
        assert_eq!(k.owned_count(), 2);

        k.accept_arrivals(gone);
        assert_eq!(k.owned_count(), 3);
    }

    #[test]
    fn step_uses_ghosts_as_force_sources() {
        let size = constants::box_size(1000);
        let mut k = LocalKernel::new(vec![part(1, 0.05, 0.05)], size);
        // Ghost within cutoff, directly above.
        k.set_ghosts(vec![part(2, 0.05, 0.05 + 0.5 * CUTOFF)]);
        k.step();
        let p = k.owned()[0];
        assert!(p.vy < 0.0, "owned particle pushed away from ghost above");
    }
}
