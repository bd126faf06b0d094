//! Ghost exchange and particle migration between neighboring units.
//!
//! Both operations are explicit-copy message passing resolved at the step
//! barrier: every unit's outgoing payloads are produced before any
//! incoming payload is consumed, so no send/receive ordering can deadlock
//! for any particle count or unit count. Payloads cross the unit boundary
//! as encoded byte buffers -- the same wire representation a network
//! transport would carry.

use kernel::{bin_row, particle, GhostParticle, Particle};

use crate::domain::{owner_of, Subdomain};

/// Ghost wire records for the particles of `parts` sitting in bin row `row`.
fn boundary_row(parts: &[Particle], row: u32, num_rows: u32) -> Vec<GhostParticle> {
    parts
        .iter()
        .filter(|p| bin_row(p.y, num_rows) == row)
        .map(GhostParticle::from_particle)
        .collect()
}

/// Run one ghost exchange: every unit publishes its boundary bin row(s) to
/// its neighbor(s) and receives theirs.
///
/// Returns, per unit, the materialized ghost set for this step. Position
/// only crosses the boundary; velocity and acceleration are not shipped
/// because a non-owning neighbor never integrates a ghost. For a
/// single-unit run there are no neighbors and this is a no-op.
pub fn exchange_ghosts(subs: &[Subdomain]) -> Vec<Vec<Particle>> {
    let mut inboxes: Vec<Vec<Vec<u8>>> = vec![Vec::new(); subs.len()];

    // Send phase: each unit encodes the boundary row facing each neighbor.
    for sub in subs {
        let strip = &sub.strip;
        let owned = sub.kernel.owned();
        if let Some(below) = strip.below() {
            let row = boundary_row(owned, strip.row_start, strip.num_rows);
            inboxes[below].push(particle::encode(&row));
        }
        if let Some(above) = strip.above() {
            let row = boundary_row(owned, strip.last_row(), strip.num_rows);
            inboxes[above].push(particle::encode(&row));
        }
    }

    // Receive phase: decode and materialize read-only local copies.
    inboxes
        .into_iter()
        .map(|msgs| {
            msgs.iter()
                .flat_map(|m| particle::decode::<GhostParticle>(m))
                .map(|g| g.materialize())
                .collect()
        })
        .collect()
}

/// Route particles that left their unit's strip to their new owners.
///
/// `departed[rank]` holds the particles unit `rank` no longer owns after
/// integration. The full record crosses the boundary: the receiving unit
/// becomes the owner and must continue integration with the particle's
/// velocity and acceleration intact. A step with no migration is a cheap
/// no-op.
pub fn route_migrants(
    departed: Vec<Vec<Particle>>,
    num_units: usize,
    num_rows: u32,
) -> Vec<Vec<Particle>> {
    let mut outboxes: Vec<Vec<Particle>> = vec![Vec::new(); num_units];
    for migrants in departed {
        for p in migrants {
            outboxes[owner_of(&p, num_units, num_rows)].push(p);
        }
    }

    // Wire round-trip per destination, matching what a transport would see.
    outboxes
        .into_iter()
        .map(|batch| {
            if batch.is_empty() {
                batch
            } else {
                particle::decode(&particle::encode(&batch))
            }
        })
        .collect()
}
