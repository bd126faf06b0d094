//! Uniform-grid spatial index for neighbor search.
//!
//! Uses sorted-index + cell-offset arrays rather than `HashMap` so a
//! rebuild is two linear passes and lookups never chase pointers. Cell
//! side equals the interaction cutoff, so for any particle the 3x3 block
//! of adjacent cells contains every possible interaction partner.

use crate::constants::CUTOFF;
use crate::particle::Particle;

/// Number of bin rows (and columns) for a box of side `size`.
pub fn num_rows(size: f64) -> u32 {
    ((size / CUTOFF).ceil() as u32).max(1)
}

/// Bin row of a y coordinate, clamped into `[0, rows)`.
///
/// Clamping guards against floating-point drift placing a particle exactly
/// on the `size` boundary; decomposition and binning must agree on this
/// mapping or a particle could be owned by no unit.
#[inline]
pub fn bin_row(y: f64, rows: u32) -> u32 {
    ((y / CUTOFF).floor().max(0.0) as u32).min(rows - 1)
}

/// Uniform grid of cutoff-sized bins over the square box `[0, size)^2`.
pub struct BinGrid {
    dims: [u32; 2],
    /// Cell index for each particle (parallel to the particle slice).
    cell_indices: Vec<u32>,
    /// Particle indices sorted by cell index.
    sorted_indices: Vec<u32>,
    /// Start offset in `sorted_indices` for each cell.
    cell_offsets: Vec<u32>,
    /// Number of particles in each cell.
    cell_counts: Vec<u32>,
}

impl BinGrid {
    /// Create an empty grid covering a box of side `size`.
    pub fn new(size: f64) -> Self {
        let n = num_rows(size);
        let dims = [n, n];
        let total_cells = (dims[0] as usize) * (dims[1] as usize);
        Self {
            dims,
            cell_indices: Vec::new(),
            sorted_indices: Vec::new(),
            cell_offsets: vec![0; total_cells],
            cell_counts: vec![0; total_cells],
        }
    }

    /// Total number of cells in the grid.
    pub fn total_cells(&self) -> usize {
        (self.dims[0] as usize) * (self.dims[1] as usize)
    }

    /// Map a position to a cell (cx, cy), clamped to grid bounds.
    #[inline]
    fn pos_to_cell(&self, px: f64, py: f64) -> (u32, u32) {
        let cx = ((px / CUTOFF).floor().max(0.0) as u32).min(self.dims[0] - 1);
        let cy = bin_row(py, self.dims[1]);
        (cx, cy)
    }

    /// Flat cell index from (cx, cy).
    #[inline]
    fn cell_hash(&self, cx: u32, cy: u32) -> u32 {
        cx + cy * self.dims[0]
    }

    /// Rebuild the index from current particle positions.
    ///
    /// Cost is O(particle count + cell count); called once per step with
    /// the unit's owned particles followed by this step's ghosts.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        let n = particles.len();
        let total_cells = self.total_cells();

        // 1. Cell index per particle.
        self.cell_indices.resize(n, 0);
        for (i, p) in particles.iter().enumerate() {
            let (cx, cy) = self.pos_to_cell(p.x, p.y);
            self.cell_indices[i] = self.cell_hash(cx, cy);
        }

        // 2. Count particles per cell.
        self.cell_counts.clear();
        self.cell_counts.resize(total_cells, 0);
        for &ci in &self.cell_indices {
            self.cell_counts[ci as usize] += 1;
        }

        // 3. Prefix-sum to get cell offsets.
        self.cell_offsets.clear();
        self.cell_offsets.resize(total_cells, 0);
        let mut running = 0u32;
        for c in 0..total_cells {
            self.cell_offsets[c] = running;
            running += self.cell_counts[c];
        }

        // 4. Scatter particle indices into sorted order.
        self.sorted_indices.resize(n, 0);
        let mut write_heads: Vec<u32> = self.cell_offsets.clone();
        for i in 0..n {
            let ci = self.cell_indices[i] as usize;
            let pos = write_heads[ci] as usize;
            self.sorted_indices[pos] = i as u32;
            write_heads[ci] += 1;
        }
    }

    /// Invoke `f` with the index of every particle within `CUTOFF` of
    /// particle `particle_idx` (strictly closer, never the particle itself).
    ///
    /// Scans the 3x3 block of cells around the particle's own cell; the
    /// cell side equals the cutoff, so no interaction partner can sit
    /// outside that block.
    pub fn for_each_neighbor<F>(&self, particle_idx: usize, particles: &[Particle], mut f: F)
    where
        F: FnMut(usize),
    {
        let px = particles[particle_idx].x;
        let py = particles[particle_idx].y;
        let (cx, cy) = self.pos_to_cell(px, py);
        let cutoff_sq = CUTOFF * CUTOFF;

        for dy in -1i32..=1 {
            let ny = cy as i32 + dy;
            if ny < 0 || ny >= self.dims[1] as i32 {
                continue;
            }
            for dx in -1i32..=1 {
                let nx = cx as i32 + dx;
                if nx < 0 || nx >= self.dims[0] as i32 {
                    continue;
                }
                let cell = self.cell_hash(nx as u32, ny as u32) as usize;
                let start = self.cell_offsets[cell] as usize;
                let count = self.cell_counts[cell] as usize;

                for s in start..start + count {
                    let j = self.sorted_indices[s] as usize;
                    if j == particle_idx {
                        continue;
                    }
                    let ddx = px - particles[j].x;
                    let ddy = py - particles[j].y;
                    if ddx * ddx + ddy * ddy < cutoff_sq {
                        f(j);
                    }
                }
            }
        }
    }

    /// Bin assignment of each particle from the last rebuild, exposed for
    /// verification.
    #[cfg(test)]
    fn assignment(&self) -> &[u32] {
        &self.cell_indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: u64, x: f64, y: f64) -> Particle {
        Particle { id, x, y, vx: 0.0, vy: 0.0, ax: 0.0, ay: 0.0 }
    }

    #[test]
    fn grid_dimensions_cover_box() {
        // size = 0.1, cutoff = 0.01 -> 10 cells per axis
        let grid = BinGrid::new(0.1);
        assert_eq!(grid.total_cells(), 100);
    }

    #[test]
    fn single_particle_has_no_neighbors() {
        let mut grid = BinGrid::new(0.1);
        let parts = vec![part(1, 0.05, 0.05)];
        grid.rebuild(&parts);
        let mut seen = Vec::new();
        grid.for_each_neighbor(0, &parts, |j| seen.push(j));
        assert!(seen.is_empty());
    }

    #[test]
    fn neighbors_found_across_cell_boundary() {
        let mut grid = BinGrid::new(0.1);
        // Adjacent cells, separation 0.002 < cutoff.
        let parts = vec![part(1, 0.0095, 0.05), part(2, 0.0115, 0.05)];
        grid.rebuild(&parts);

        let mut seen = Vec::new();
        grid.for_each_neighbor(0, &parts, |j| seen.push(j));
        assert_eq!(seen, vec![1]);

        seen.clear();
        grid.for_each_neighbor(1, &parts, |j| seen.push(j));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn same_cell_but_beyond_cutoff_is_filtered() {
        let mut grid = BinGrid::new(1.0);
        // Diagonal offset of 0.75 cutoff per axis: adjacent cells, but the
        // straight-line separation is just over the cutoff.
        let d = CUTOFF * 0.75;
        let parts = vec![part(1, 0.02, 0.02), part(2, 0.02 + d, 0.02 + d)];
        grid.rebuild(&parts);
        let mut seen = Vec::new();
        grid.for_each_neighbor(0, &parts, |j| seen.push(j));
        assert!(seen.is_empty(), "diagonal separation {} exceeds cutoff", d * 2f64.sqrt());
    }

    #[test]
    fn boundary_position_is_clamped() {
        let size = 0.1;
        let mut grid = BinGrid::new(size);
        // Exactly on the upper boundary: must clamp into the last cell
        // instead of indexing out of bounds.
        let parts = vec![part(1, size, size)];
        grid.rebuild(&parts);
        let mut seen = Vec::new();
        grid.for_each_neighbor(0, &parts, |j| seen.push(j));
        assert!(seen.is_empty());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut grid = BinGrid::new(0.2);
        let parts: Vec<Particle> = (0..50)
            .map(|i| part(i as u64, (i as f64 * 0.0037) % 0.2, (i as f64 * 0.0091) % 0.2))
            .collect();
        grid.rebuild(&parts);
        let first = grid.assignment().to_vec();
        grid.rebuild(&parts);
        assert_eq!(grid.assignment(), &first[..]);
    }

    #[test]
    fn bin_row_agrees_with_grid_cells() {
        let size = 0.1;
        let rows = num_rows(size);
        let grid = BinGrid::new(size);
        for &y in &[0.0, 0.0049, 0.0551, size - 1e-9, size] {
            let (_, cy) = grid.pos_to_cell(0.05, y);
            assert_eq!(cy, bin_row(y, rows));
        }
    }
}
