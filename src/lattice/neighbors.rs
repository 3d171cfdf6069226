//! Distance-based neighbor search on a uniform cell grid
//!
//! Atoms are bucketed into cubic cells at least as large as the search radius,
//! so any pair within that radius lies in the same or an adjacent cell. Only
//! the 27 surrounding cells are scanned per atom, which keeps the search linear
//! in the number of atoms while reproducing the all-pairs result exactly.

use itertools::iproduct;
use nalgebra::Vector3;
use std::collections::HashMap;

type CellKey = (i64, i64, i64);

/// Keeps pairs sitting exactly on the search radius in adjacent cells even
/// when the coordinate division rounds up.
const CELL_PADDING: f64 = 1.0 + 1e-9;

/// Spatial hash of atom indices keyed by integer cell coordinates
#[derive(Debug, Clone)]
pub struct CellGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl CellGrid {
    pub fn new(radius: f64) -> Self {
        Self {
            cell_size: radius * CELL_PADDING,
            cells: HashMap::new(),
        }
    }

    fn key(&self, position: &Vector3<f64>) -> CellKey {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
            (position.z / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, index: usize, position: &Vector3<f64>) {
        let key = self.key(position);
        self.cells.entry(key).or_default().push(index);
    }

    /// Indices stored in the cell containing `position` and its 26 neighbors
    pub fn candidates<'a>(&'a self, position: &Vector3<f64>) -> impl Iterator<Item = usize> + 'a {
        let (cx, cy, cz) = self.key(position);
        iproduct!(-1i64..=1, -1i64..=1, -1i64..=1)
            .filter_map(move |(dx, dy, dz)| {
                let key = (
                    cx.saturating_add(dx),
                    cy.saturating_add(dy),
                    cz.saturating_add(dz),
                );
                self.cells.get(&key)
            })
            .flat_map(|bucket| bucket.iter().copied())
    }
}

/// Connect every pair of positions whose Euclidean distance is `<= cutoff`.
///
/// Returns one list per position, sorted by ascending index. The relation is
/// symmetric because the distance of a pair does not depend on its order.
pub fn connect_within(positions: &[Vector3<f64>], cutoff: f64) -> Vec<Vec<usize>> {
    let mut grid = CellGrid::new(cutoff);
    for (index, position) in positions.iter().enumerate() {
        grid.insert(index, position);
    }

    positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let mut neighbors: Vec<usize> = grid
                .candidates(position)
                .filter(|&j| j != i && (positions[j] - position).norm() <= cutoff)
                .collect();
            neighbors.sort_unstable();
            neighbors
        })
        .collect()
}

/// Ordered set of positions that rejects points closer than `tolerance` to
/// one already inserted
#[derive(Debug, Clone)]
pub struct PositionSet {
    tolerance: f64,
    grid: CellGrid,
    positions: Vec<Vector3<f64>>,
}

impl PositionSet {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            grid: CellGrid::new(tolerance),
            positions: Vec::new(),
        }
    }

    pub fn contains_near(&self, position: &Vector3<f64>) -> bool {
        self.grid
            .candidates(position)
            .any(|j| (self.positions[j] - position).norm() < self.tolerance)
    }

    /// Insert unless a point already lies within tolerance; returns whether
    /// the point was added
    pub fn insert(&mut self, position: Vector3<f64>) -> bool {
        if self.contains_near(&position) {
            return false;
        }
        self.grid.insert(self.positions.len(), &position);
        self.positions.push(position);
        true
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn into_positions(self) -> Vec<Vector3<f64>> {
        self.positions
    }
}
