use super::neighbors::connect_within;
use super::{atoms_with_neighbors, Atom};
use itertools::iproduct;
use nalgebra::Vector3;

/// Ideal c/a ratio of a close-packed hexagonal crystal, sqrt(8/3)
pub const C_OVER_A: f64 = 1.632_993_161_855_452;

/// Neighbors are connected within this multiple of the lattice constant
pub const NEIGHBOR_CUTOFF: f64 = 1.1;

/// Hexagonal close-packed lattice with ABAB stacking.
///
/// `x` columns, `y` rows and `z` layers. Rows are spaced `a * sqrt(3) / 2`
/// apart and odd rows are shifted by `a / 2` so each layer is a triangular net.
/// B layers (odd) sit over the triangle centroids of the A layers, shifted by
/// `(a / 2, a * sqrt(3) / 6)`. Layers are `c / 2` apart.
pub(super) fn build(x: usize, y: usize, z: usize, distance: f64) -> Vec<Atom> {
    let a = distance;
    let row_pitch = a * 3f64.sqrt() / 2.0;
    let layer_pitch = a * C_OVER_A / 2.0;
    let b_layer_shift = Vector3::new(a / 2.0, a * 3f64.sqrt() / 6.0, 0.0);

    let positions: Vec<Vector3<f64>> = iproduct!(0..z, 0..y, 0..x)
        .map(|(layer, row, col)| {
            let mut position = Vector3::new(
                col as f64 * a,
                row as f64 * row_pitch,
                layer as f64 * layer_pitch,
            );
            if layer % 2 == 1 {
                position += b_layer_shift;
            }
            if row % 2 == 1 {
                position.x += a / 2.0;
            }
            position
        })
        .collect();

    let neighbors = connect_within(&positions, a * NEIGHBOR_CUTOFF);
    atoms_with_neighbors(positions, neighbors)
}
