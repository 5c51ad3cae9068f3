use crate::core::models::simulation_box::SimulationBox;
use nalgebra::{Point3, Vector3};

/// Minimum number of cells per axis for a periodic cell list.
///
/// With fewer, the 27-cell neighbourhood of a cell visits some cells twice.
pub const MIN_CELLS_PER_AXIS: usize = 3;

/// Periodic cell list over an orthorhombic box.
///
/// The box is split into `floor(L / cutoff)` cells per axis, so every pair
/// closer than the cutoff lives in the same or an adjacent cell, counting
/// across the periodic boundary.
#[derive(Debug, Clone)]
pub struct CellList {
    dims: [usize; 3],
    cells: Vec<Vec<usize>>,
}

impl CellList {
    /// Bins `positions` into cells at least `cutoff` wide.
    ///
    /// Returns `None` if any axis would hold fewer than
    /// [`MIN_CELLS_PER_AXIS`] cells; callers fall back to the all-pairs loop.
    pub fn build(
        simulation_box: &SimulationBox,
        positions: &[Point3<f64>],
        cutoff: f64,
    ) -> Option<Self> {
        let lengths = simulation_box.lengths();
        let mut dims = [0usize; 3];
        for (axis, dim) in dims.iter_mut().enumerate() {
            let n = (lengths[axis] / cutoff).floor();
            if !n.is_finite() || n < MIN_CELLS_PER_AXIS as f64 {
                return None;
            }
            *dim = n as usize;
        }

        let mut cells = vec![Vec::new(); dims[0] * dims[1] * dims[2]];
        for (index, position) in positions.iter().enumerate() {
            let cell = Self::cell_of(&dims, lengths, position);
            cells[Self::flat(&dims, cell)].push(index);
        }
        Some(Self { dims, cells })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    fn cell_of(dims: &[usize; 3], lengths: &Vector3<f64>, position: &Point3<f64>) -> [usize; 3] {
        let mut cell = [0usize; 3];
        for axis in 0..3 {
            let l = lengths[axis];
            let fractional = position[axis] / l - (position[axis] / l).floor();
            cell[axis] = ((fractional * dims[axis] as f64) as usize).min(dims[axis] - 1);
        }
        cell
    }

    #[inline]
    fn flat(dims: &[usize; 3], cell: [usize; 3]) -> usize {
        (cell[0] * dims[1] + cell[1]) * dims[2] + cell[2]
    }

    /// Every candidate pair `(i, j)` with `i < j` in the same or a
    /// neighbouring cell, sorted ascending.
    ///
    /// Candidates still need a distance check against the cutoff.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let [nx, ny, nz] = self.dims;
        let mut pairs = Vec::new();
        for cx in 0..nx {
            for cy in 0..ny {
                for cz in 0..nz {
                    let home = &self.cells[Self::flat(&self.dims, [cx, cy, cz])];
                    if home.is_empty() {
                        continue;
                    }
                    for neighbor in Self::neighborhood(&self.dims, [cx, cy, cz]) {
                        let others = &self.cells[neighbor];
                        for &i in home {
                            pairs.extend(others.iter().filter(|&&j| i < j).map(|&j| (i, j)));
                        }
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    fn neighborhood(dims: &[usize; 3], cell: [usize; 3]) -> impl Iterator<Item = usize> + '_ {
        let wrap = |c: usize, d: isize, n: usize| ((c as isize + d).rem_euclid(n as isize)) as usize;
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).map(move |dz| {
                    Self::flat(
                        dims,
                        [
                            wrap(cell[0], dx, dims[0]),
                            wrap(cell[1], dy, dims[1]),
                            wrap(cell[2], dz, dims[2]),
                        ],
                    )
                })
            })
        })
    }
}
