//! Strip domain decomposition over bin rows.
//!
//! The box's bin grid is split into contiguous horizontal strips of rows,
//! one per compute unit. A 1-D strip keeps the exchange perimeter minimal:
//! each unit has at most two neighbors and ships a constant-depth ghost
//! margin per step. Every unit computes its strip purely from its rank and
//! the unit count; no negotiation.

use kernel::{bin_row, LocalKernel, Particle};

/// The contiguous range of bin rows owned by one compute unit.
#[derive(Debug, Clone)]
pub struct Strip {
    /// This unit's rank, `0..num_units`.
    pub rank: usize,
    /// Total number of units.
    pub num_units: usize,
    /// First owned bin row.
    pub row_start: u32,
    /// Number of owned rows (always >= 1).
    pub row_count: u32,
    /// Total bin rows in the grid.
    pub num_rows: u32,
}

impl Strip {
    /// One past the last owned row.
    pub fn row_end(&self) -> u32 {
        self.row_start + self.row_count
    }

    /// Last owned row.
    pub fn last_row(&self) -> u32 {
        self.row_end() - 1
    }

    /// Whether this strip owns `row`.
    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.row_start && row < self.row_end()
    }

    /// Rank of the neighbor below (absent for the bottom strip).
    pub fn below(&self) -> Option<usize> {
        (self.rank > 0).then(|| self.rank - 1)
    }

    /// Rank of the neighbor above (absent for the top strip).
    pub fn above(&self) -> Option<usize> {
        (self.rank + 1 < self.num_units).then(|| self.rank + 1)
    }
}

/// Partition `num_rows` bin rows among `num_units` units.
///
/// Balanced remainder distribution: the first `num_rows % num_units` ranks
/// get one extra row. The strips partition the grid exactly -- no overlap,
/// full cover. Requires `1 <= num_units <= num_rows`.
pub fn decompose(num_units: usize, num_rows: u32) -> Vec<Strip> {
    debug_assert!(num_units >= 1);
    debug_assert!(num_units as u32 <= num_rows);

    let base = num_rows / num_units as u32;
    let rem = num_rows % num_units as u32;

    (0..num_units)
        .map(|rank| {
            let r = rank as u32;
            let row_start = r * base + r.min(rem);
            let row_count = base + u32::from(r < rem);
            Strip { rank, num_units, row_start, row_count, num_rows }
        })
        .collect()
}

/// Rank owning `row`; the closed-form inverse of [`decompose`].
pub fn owner_of_row(row: u32, num_units: usize, num_rows: u32) -> usize {
    let base = num_rows / num_units as u32;
    let rem = num_rows % num_units as u32;
    let threshold = rem * (base + 1);
    if row < threshold {
        (row / (base + 1)) as usize
    } else {
        (rem + (row - threshold) / base) as usize
    }
}

/// Rank owning a particle, by its current bin row.
pub fn owner_of(p: &Particle, num_units: usize, num_rows: u32) -> usize {
    owner_of_row(bin_row(p.y, num_rows), num_units, num_rows)
}

/// One compute unit: its strip and its local kernel.
pub struct Subdomain {
    /// The bin-row range this unit owns.
    pub strip: Strip,
    /// Local particle state and spatial index.
    pub kernel: LocalKernel,
}

/// Distribute the initial particle set into per-unit subdomains.
///
/// Every particle lands in exactly one subdomain (the one whose strip
/// contains its bin row), so the subdomains partition the set.
pub fn build_subdomains(
    particles: &[Particle],
    size: f64,
    num_units: usize,
    num_rows: u32,
) -> Vec<Subdomain> {
    let strips = decompose(num_units, num_rows);

    let mut buckets: Vec<Vec<Particle>> = vec![Vec::new(); num_units];
    for p in particles {
        buckets[owner_of(p, num_units, num_rows)].push(*p);
    }

    strips
        .into_iter()
        .zip(buckets)
        .map(|(strip, owned)| {
            tracing::debug!(
                "subdomain {}: rows {}..{}, {} particles",
                strip.rank,
                strip.row_start,
                strip.row_end(),
                owned.len()
            );
            Subdomain { strip, kernel: LocalKernel::new(owned, size) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_partitions_exactly() {
        for &(units, rows) in &[(1usize, 10u32), (3, 10), (4, 10), (7, 23), (10, 10)] {
            let strips = decompose(units, rows);
            assert_eq!(strips.len(), units);
            // Contiguous, non-overlapping, full cover.
            assert_eq!(strips[0].row_start, 0);
            for w in strips.windows(2) {
                assert_eq!(w[0].row_end(), w[1].row_start);
            }
            assert_eq!(strips[units - 1].row_end(), rows);
            for s in &strips {
                assert!(s.row_count >= 1);
            }
        }
    }

    #[test]
    fn owner_of_row_matches_decompose() {
        for &(units, rows) in &[(1usize, 5u32), (2, 9), (3, 10), (5, 17)] {
            let strips = decompose(units, rows);
            for row in 0..rows {
                let owner = owner_of_row(row, units, rows);
                assert!(
                    strips[owner].contains_row(row),
                    "row {} assigned to rank {} whose strip is {}..{}",
                    row,
                    owner,
                    strips[owner].row_start,
                    strips[owner].row_end()
                );
            }
        }
    }

    #[test]
    fn end_strips_have_one_neighbor() {
        let strips = decompose(3, 9);
        assert_eq!(strips[0].below(), None);
        assert_eq!(strips[0].above(), Some(1));
        assert_eq!(strips[1].below(), Some(0));
        assert_eq!(strips[1].above(), Some(2));
        assert_eq!(strips[2].below(), Some(1));
        assert_eq!(strips[2].above(), None);
    }

    #[test]
    fn single_unit_has_no_neighbors() {
        let strips = decompose(1, 4);
        assert_eq!(strips[0].below(), None);
        assert_eq!(strips[0].above(), None);
        assert_eq!(strips[0].row_count, 4);
    }

    #[test]
    fn build_subdomains_assigns_every_particle_once() {
        let size = 0.1; // 10 rows at cutoff 0.01
        let particles: Vec<Particle> = (0..40)
            .map(|i| Particle {
                id: i + 1,
                x: 0.05,
                y: (i as f64 + 0.5) * size / 40.0,
                vx: 0.0,
                vy: 0.0,
                ax: 0.0,
                ay: 0.0,
            })
            .collect();

        let subs = build_subdomains(&particles, size, 3, 10);
        let total: usize = subs.iter().map(|s| s.kernel.owned_count()).sum();
        assert_eq!(total, 40);

        let mut ids: Vec<u64> = subs
            .iter()
            .flat_map(|s| s.kernel.owned().iter().map(|p| p.id))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=40).collect::<Vec<u64>>());
    }
}
