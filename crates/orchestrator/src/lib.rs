//! Orchestration layer for the short-range particle simulation.
//!
//! This crate wires the compute kernel into a full run:
//! - Configuration parsing and validation
//! - Seeded particle initialization
//! - Strip domain decomposition and per-unit subdomains
//! - Ghost exchange and migration between neighboring units
//! - The distributed step coordinator and snapshot gather
//!
//! The compute core itself (binning, forces, integration) lives in the
//! `kernel` crate; this layer owns everything that crosses unit
//! boundaries.

#![warn(missing_docs)]

pub mod config;
pub mod distributed;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod init;
pub mod snapshot;

pub use config::SimulationConfig;
pub use distributed::{run_distributed, run_single_unit, RunResult};
pub use error::SimulationError;
pub use snapshot::SnapshotWriter;

use kernel::Particle;

/// Run a complete simulation from a validated configuration.
///
/// Initializes the particle set from the configured seed, then executes
/// the distributed run. `on_snapshot` receives the gathered global state
/// every `savefreq` steps; pass a writer-backed closure for file output or
/// a no-op for benchmarking.
pub fn run<F>(config: &SimulationConfig, on_snapshot: F) -> Result<RunResult, SimulationError>
where
    F: FnMut(u32, &[Particle]) -> Result<(), SimulationError>,
{
    config.validate()?;

    let size = config.box_size();
    tracing::info!(
        "initializing {} particles, seed {}, box size {:.6}",
        config.num_parts,
        config.seed,
        size
    );
    let particles = init::init_particles(config.num_parts, config.seed, size);

    distributed::run_distributed(config, particles, on_snapshot)
}
