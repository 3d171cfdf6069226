use super::{atoms_with_neighbors, Atom};
use itertools::iproduct;
use nalgebra::Vector3;

/// Simple cubic lattice with one atom per cell at `(i, j, k) * distance`.
///
/// Sites are stored at flat index `i * y * z + j * z + k`, so neighbors come
/// straight from index arithmetic: up to six axis-aligned sites.
pub(super) fn build(x: usize, y: usize, z: usize, distance: f64) -> Vec<Atom> {
    let index = |i: usize, j: usize, k: usize| i * y * z + j * z + k;

    let mut positions = Vec::with_capacity(x * y * z);
    let mut neighbors = Vec::with_capacity(x * y * z);

    for (i, j, k) in iproduct!(0..x, 0..y, 0..z) {
        positions.push(Vector3::new(i as f64, j as f64, k as f64) * distance);

        let mut neigh = Vec::with_capacity(6);
        if i > 0 {
            neigh.push(index(i - 1, j, k));
        }
        if i + 1 < x {
            neigh.push(index(i + 1, j, k));
        }
        if j > 0 {
            neigh.push(index(i, j - 1, k));
        }
        if j + 1 < y {
            neigh.push(index(i, j + 1, k));
        }
        if k > 0 {
            neigh.push(index(i, j, k - 1));
        }
        if k + 1 < z {
            neigh.push(index(i, j, k + 1));
        }
        neighbors.push(neigh);
    }

    atoms_with_neighbors(positions, neighbors)
}
