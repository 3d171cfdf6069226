use super::neighbors::{connect_within, PositionSet};
use super::{atoms_with_neighbors, Atom};
use itertools::iproduct;
use nalgebra::Vector3;

/// Nearest neighbors in FCC sit at a / sqrt(2); the cutoff leaves room for
/// rounding without reaching the second shell at a.
pub const NEIGHBOR_CUTOFF: f64 = 0.75;

/// Atoms closer than this fraction of `a` are treated as the same site
pub const DEDUP_TOLERANCE: f64 = 0.01;

/// Face-centered cubic lattice: per unit cell a corner atom and the three face
/// centers touching that corner.
pub(super) fn build(x: usize, y: usize, z: usize, distance: f64) -> Vec<Atom> {
    let a = distance;
    let basis = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(a / 2.0, a / 2.0, 0.0),
        Vector3::new(a / 2.0, 0.0, a / 2.0),
        Vector3::new(0.0, a / 2.0, a / 2.0),
    ];

    let mut sites = PositionSet::new(a * DEDUP_TOLERANCE);
    for (i, j, k) in iproduct!(0..x, 0..y, 0..z) {
        let origin = Vector3::new(i as f64, j as f64, k as f64) * a;
        for offset in &basis {
            sites.insert(origin + offset);
        }
    }

    let positions = sites.into_positions();
    let neighbors = connect_within(&positions, a * NEIGHBOR_CUTOFF);
    atoms_with_neighbors(positions, neighbors)
}
