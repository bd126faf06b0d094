//! Configuration parsing and validation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use kernel::constants;

use crate::error::SimulationError;

/// Run configuration.
///
/// The physical constants (cutoff, timestep, mass, density) are fixed by
/// the problem and are not configurable; see [`kernel::constants`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of particles.
    pub num_parts: usize,
    /// Initialization seed; 0 means "derive from entropy".
    #[serde(default)]
    pub seed: u64,
    /// Number of compute units (worker threads / subdomain strips).
    #[serde(default = "default_num_units")]
    pub num_units: usize,
    /// Number of simulation steps.
    #[serde(default = "default_nsteps")]
    pub nsteps: u32,
    /// Snapshot period in steps.
    #[serde(default = "default_savefreq")]
    pub savefreq: u32,
    /// Snapshot output path; no snapshots are collected when absent.
    #[serde(default)]
    pub output: Option<String>,
}

fn default_num_units() -> usize {
    1
}

fn default_nsteps() -> u32 {
    constants::NSTEPS
}

fn default_savefreq() -> u32 {
    constants::SAVEFREQ
}

impl SimulationConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. The core assumes validated, positive
    /// inputs; rejection happens here, before any unit starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_parts == 0 {
            return Err(SimulationError::Config(
                "num_parts must be at least 1".to_string(),
            ));
        }
        if self.num_units == 0 {
            return Err(SimulationError::Config(
                "num_units must be at least 1".to_string(),
            ));
        }
        if self.nsteps == 0 {
            return Err(SimulationError::Config(
                "nsteps must be at least 1".to_string(),
            ));
        }
        if self.savefreq == 0 {
            return Err(SimulationError::Config(
                "savefreq must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Side length of the simulation box for this particle count.
    pub fn box_size(&self) -> f64 {
        constants::box_size(self.num_parts)
    }
}
