//! Distributed parallel execution coordinator.
//!
//! Runs the per-step pipeline across N subdomain strips, one worker thread
//! per strip, with ghost exchange before force evaluation and particle
//! migration after integration. All cross-unit handoff is by explicit
//! copy; the join at the end of each phase is the only synchronization
//! barrier. The coordinator is thread-based, but the exchange payloads are
//! already wire-encoded, so a network transport can replace the in-process
//! hop without touching the step pipeline.

use std::sync::{Arc, Mutex};
use std::thread;

use kernel::constants::DT;
use kernel::{bin_row, num_rows, LocalKernel, Particle};

use crate::config::SimulationConfig;
use crate::domain::{build_subdomains, Strip, Subdomain};
use crate::error::SimulationError;
use crate::exchange::{exchange_ghosts, route_migrants};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final global particle state, in id order.
    pub particles: Vec<Particle>,
    /// Number of steps executed.
    pub steps: u32,
    /// Total simulated time (seconds).
    pub sim_time: f64,
}

/// Collect every unit's owned particles into one id-ordered vector.
///
/// This is the "gather everything back to one place" collective: a pure
/// collection with no physics, used for snapshots and the final result.
pub fn gather_particles(subs: &[Subdomain]) -> Vec<Particle> {
    let mut all: Vec<Particle> = subs
        .iter()
        .flat_map(|s| s.kernel.owned().iter().copied())
        .collect();
    all.sort_unstable_by_key(|p| p.id);
    all
}

/// Check the gathered set against the initial identity set.
///
/// A duplicate means two units both own a particle; a missing identity
/// means one was dropped. Either indicates a decomposition or migration
/// bug and aborts the run.
fn audit_identities(
    gathered: &[Particle],
    expected_ids: &[u64],
    step: u32,
) -> Result<(), SimulationError> {
    for w in gathered.windows(2) {
        if w[0].id == w[1].id {
            return Err(SimulationError::DuplicateOwnership {
                id: w[1].id,
                x: w[1].x,
                y: w[1].y,
            });
        }
    }
    if gathered.len() != expected_ids.len() {
        let missing_id = expected_ids
            .iter()
            .find(|&&id| gathered.binary_search_by_key(&id, |p| p.id).is_err())
            .copied()
            .unwrap_or(0);
        return Err(SimulationError::CountMismatch {
            step,
            found: gathered.len(),
            expected: expected_ids.len(),
            missing_id,
        });
    }
    Ok(())
}

/// Run the simulation across `config.num_units` subdomain strips.
///
/// `on_snapshot` is invoked every `savefreq` steps with the step number
/// and the gathered, id-ordered global particle set; snapshot I/O lives
/// with the caller, not the core.
pub fn run_distributed<F>(
    config: &SimulationConfig,
    particles: Vec<Particle>,
    mut on_snapshot: F,
) -> Result<RunResult, SimulationError>
where
    F: FnMut(u32, &[Particle]) -> Result<(), SimulationError>,
{
    let size = config.box_size();
    let rows = num_rows(size);
    let num_parts = particles.len();

    // Every unit must own at least one bin row.
    let units = config.num_units.min(rows as usize).max(1);
    if units < config.num_units {
        tracing::warn!(
            "reducing {} requested units to {}: the grid has only {} bin rows",
            config.num_units,
            units,
            rows
        );
    }

    let mut expected_ids: Vec<u64> = particles.iter().map(|p| p.id).collect();
    expected_ids.sort_unstable();

    let mut subs = build_subdomains(&particles, size, units, rows);
    tracing::info!(
        "distributed run: {} units, {} particles, {}x{} bins, {} steps",
        units,
        num_parts,
        rows,
        rows,
        config.nsteps
    );

    for step in 0..config.nsteps {
        // a. Ghost exchange. Each unit's ghost set is complete before any
        //    unit evaluates forces; a partial set would silently miss
        //    interactions at the strip boundary.
        let ghosts = exchange_ghosts(&subs);

        // b. Advance every subdomain in parallel. Kernels move into their
        //    worker threads and come back with this step's migrants.
        let (strips, kernels): (Vec<Strip>, Vec<LocalKernel>) =
            subs.into_iter().map(|s| (s.strip, s.kernel)).unzip();

        let results: Arc<Mutex<Vec<Option<(LocalKernel, Vec<Particle>)>>>> =
            Arc::new(Mutex::new((0..units).map(|_| None).collect()));

        let mut handles = Vec::with_capacity(units);
        for ((rank, mut kernel), ghost_set) in kernels.into_iter().enumerate().zip(ghosts) {
            let strip = strips[rank].clone();
            let results = Arc::clone(&results);
            handles.push(thread::spawn(move || {
                kernel.set_ghosts(ghost_set);
                kernel.step();
                let rows = strip.num_rows;
                let departed =
                    kernel.extract_departed(|p| strip.contains_row(bin_row(p.y, rows)));
                let mut lock = results.lock().unwrap();
                lock[rank] = Some((kernel, departed));
            }));
        }

        for handle in handles {
            handle
                .join()
                .map_err(|_| SimulationError::Worker("subdomain thread panicked".into()))?;
        }

        let outcomes = Arc::try_unwrap(results)
            .map_err(|_| SimulationError::Worker("step results still shared after join".into()))?
            .into_inner()
            .map_err(|_| SimulationError::Worker("step results mutex poisoned".into()))?;

        let mut stepped = Vec::with_capacity(units);
        let mut departures = Vec::with_capacity(units);
        for outcome in outcomes {
            let (kernel, departed) = outcome
                .ok_or_else(|| SimulationError::Worker("a subdomain produced no result".into()))?;
            stepped.push(kernel);
            departures.push(departed);
        }

        // c. Migration: ship each departed particle (full record) to the
        //    unit that now owns its bin row.
        let migrated: usize = departures.iter().map(|d| d.len()).sum();
        let arrivals = route_migrants(departures, units, rows);
        for (kernel, incoming) in stepped.iter_mut().zip(arrivals) {
            kernel.accept_arrivals(incoming);
        }

        subs = strips
            .into_iter()
            .zip(stepped)
            .map(|(strip, kernel)| Subdomain { strip, kernel })
            .collect();

        // Conservation: cheap count check every step, full identity audit
        // only when it trips or at gather time.
        let owned_total: usize = subs.iter().map(|s| s.kernel.owned_count()).sum();
        if owned_total != num_parts {
            audit_identities(&gather_particles(&subs), &expected_ids, step)?;
        }

        // d. Periodic gather for snapshot output.
        if step % config.savefreq == 0 {
            let gathered = gather_particles(&subs);
            audit_identities(&gathered, &expected_ids, step)?;
            on_snapshot(step, &gathered)?;
        }

        if (step + 1) % 100 == 0 {
            tracing::debug!(
                "step {}/{}: {} migrants this step",
                step + 1,
                config.nsteps,
                migrated
            );
        }
    }

    let particles = gather_particles(&subs);
    audit_identities(&particles, &expected_ids, config.nsteps)?;

    tracing::info!(
        "distributed run complete: {} steps, {} particles",
        config.nsteps,
        particles.len()
    );

    Ok(RunResult {
        particles,
        steps: config.nsteps,
        sim_time: config.nsteps as f64 * DT,
    })
}

/// Run the whole box on one unit, no exchange, no threads.
///
/// Reference path for validating that ghost exchange reproduces the true
/// within-cutoff interaction set: a multi-unit run from the same initial
/// state must track this one.
pub fn run_single_unit<F>(
    config: &SimulationConfig,
    particles: Vec<Particle>,
    mut on_snapshot: F,
) -> Result<RunResult, SimulationError>
where
    F: FnMut(u32, &[Particle]) -> Result<(), SimulationError>,
{
    let size = config.box_size();
    let mut kernel = LocalKernel::new(particles, size);

    for step in 0..config.nsteps {
        kernel.step();

        if step % config.savefreq == 0 {
            let mut gathered = kernel.owned().to_vec();
            gathered.sort_unstable_by_key(|p| p.id);
            on_snapshot(step, &gathered)?;
        }
    }

    let mut particles = kernel.into_owned();
    particles.sort_unstable_by_key(|p| p.id);

    Ok(RunResult {
        particles,
        steps: config.nsteps,
        sim_time: config.nsteps as f64 * DT,
    })
}
