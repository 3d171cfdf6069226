use super::fcc::DEDUP_TOLERANCE;
use super::neighbors::{connect_within, PositionSet};
use super::{atoms_with_neighbors, Atom};
use itertools::iproduct;
use nalgebra::Vector3;

/// Nearest neighbors in BCC sit at a * sqrt(3) / 2 ~ 0.866 a
pub const NEIGHBOR_CUTOFF: f64 = 0.9;

/// Body-centered cubic lattice: per unit cell a corner atom and the body
/// center at `(a/2, a/2, a/2)`.
pub(super) fn build(x: usize, y: usize, z: usize, distance: f64) -> Vec<Atom> {
    let a = distance;
    let body_center = Vector3::new(a / 2.0, a / 2.0, a / 2.0);

    let mut sites = PositionSet::new(a * DEDUP_TOLERANCE);
    for (i, j, k) in iproduct!(0..x, 0..y, 0..z) {
        let origin = Vector3::new(i as f64, j as f64, k as f64) * a;
        sites.insert(origin);
        sites.insert(origin + body_center);
    }

    let positions = sites.into_positions();
    let neighbors = connect_within(&positions, a * NEIGHBOR_CUTOFF);
    atoms_with_neighbors(positions, neighbors)
}
