//! Snapshot output for visualization.
//!
//! Text format: one header line `"<num_parts> <size>"`, then for every
//! saved step `num_parts` lines of `"<x> <y>"` in particle-id order,
//! followed by a blank separator line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kernel::Particle;

use crate::error::SimulationError;

/// Writes snapshot frames to any `Write` sink.
pub struct SnapshotWriter<W: Write> {
    out: W,
    wrote_header: bool,
}

impl SnapshotWriter<BufWriter<File>> {
    /// Create a snapshot file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> SnapshotWriter<W> {
    /// Wrap an output sink. The header is written with the first frame.
    pub fn new(out: W) -> Self {
        Self { out, wrote_header: false }
    }

    /// Append one frame. `particles` must already be in id order -- the
    /// gather step guarantees this, keeping output order stable across
    /// runs and unit counts.
    pub fn write_frame(&mut self, particles: &[Particle], size: f64) -> Result<(), SimulationError> {
        if !self.wrote_header {
            writeln!(self.out, "{} {}", particles.len(), size)?;
            self.wrote_header = true;
        }
        for p in particles {
            writeln!(self.out, "{} {}", p.x, p.y)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<(), SimulationError> {
        self.out.flush()?;
        Ok(())
    }
}
