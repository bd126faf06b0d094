//! Error types for the orchestration layer.
//!
//! The per-step pipeline is deterministic, so every variant here is fatal
//! for the run: there is no partial-cluster continuation and no in-loop
//! retry.

use thiserror::Error;

/// Fatal simulation errors.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Rejected before the core starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Snapshot or config file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A particle is owned by more than one unit; indicates a
    /// decomposition or migration bug.
    #[error("particle {id} at ({x:.6}, {y:.6}) is owned by multiple units")]
    DuplicateOwnership {
        /// Identity of the offending particle.
        id: u64,
        /// Position X at detection time.
        x: f64,
        /// Position Y at detection time.
        y: f64,
    },

    /// Total owned particle count diverged from the initial N.
    #[error("particle count diverged after step {step}: {found} owned, expected {expected} (first missing id: {missing_id})")]
    CountMismatch {
        /// Step at which the divergence was detected.
        step: u32,
        /// Total owned particles found across all units.
        found: usize,
        /// The initial particle count N.
        expected: usize,
        /// Lowest particle id absent from every unit.
        missing_id: u64,
    },

    /// A compute unit failed (panicked worker, poisoned shared state).
    #[error("simulation worker failed: {0}")]
    Worker(String),
}
