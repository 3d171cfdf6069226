//! Crystal lattice construction
//!
//! A [`Structure`] is an ordered list of [`Atom`]s with index-based adjacency.
//! Four crystal geometries are supported: simple cubic, hexagonal close-packed
//! (ABAB stacking), face-centered cubic and body-centered cubic. None of them
//! wrap around at the edges, so boundary atoms have fewer neighbors than
//! interior ones.

mod bcc;
mod cubic;
mod fcc;
mod hexagonal;
pub mod neighbors;

use crate::error::{IsingError, Result};
use clap::ValueEnum;
use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Binary spin state of a lattice site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// +1 for up, -1 for down
    pub fn value(self) -> i8 {
        match self {
            Spin::Up => 1,
            Spin::Down => -1,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.value() as f64
    }

    pub fn flipped(self) -> Spin {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }

    /// Draw a spin with equal probability for both orientations
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Spin {
        if rng.gen_bool(0.5) {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}

/// A single lattice site.
///
/// Position and neighbors are fixed at construction. The spin is changed only
/// by the Monte Carlo engine (or by a full re-initialisation), and the energy
/// is a cached value derived from the spins of the atom and its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    position: Vector3<f64>,
    spin: Spin,
    neighbors: Vec<usize>,
    energy: f64,
}

impl Atom {
    pub(crate) fn new(position: Vector3<f64>) -> Self {
        Self {
            position,
            spin: Spin::Up,
            neighbors: Vec::new(),
            energy: 0.0,
        }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn spin(&self) -> Spin {
        self.spin
    }

    /// Indices of neighboring atoms in the owning structure
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Cached local energy, valid after the last energy refresh
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Supported crystal geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Cubic,
    Hexagonal,
    Fcc,
    Bcc,
}

impl StructureType {
    pub const ALL: [StructureType; 4] = [
        StructureType::Cubic,
        StructureType::Hexagonal,
        StructureType::Fcc,
        StructureType::Bcc,
    ];

    /// Human readable name, as shown in a structure picker
    pub fn label(self) -> &'static str {
        match self {
            StructureType::Cubic => "Cubic",
            StructureType::Hexagonal => "Hexagonal",
            StructureType::Fcc => "Face-Centered Cubic",
            StructureType::Bcc => "Body-Centered Cubic",
        }
    }

    /// Atoms placed per unit cell (or per hexagonal site)
    pub fn atoms_per_cell(self) -> usize {
        match self {
            StructureType::Cubic | StructureType::Hexagonal => 1,
            StructureType::Fcc => 4,
            StructureType::Bcc => 2,
        }
    }

    /// Coordination number of an interior site
    pub fn coordination_number(self) -> usize {
        match self {
            StructureType::Cubic => 6,
            StructureType::Hexagonal => 12,
            StructureType::Fcc => 12,
            StructureType::Bcc => 8,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::Cubic => "cubic",
            StructureType::Hexagonal => "hexagonal",
            StructureType::Fcc => "fcc",
            StructureType::Bcc => "bcc",
        };
        f.write_str(name)
    }
}

impl FromStr for StructureType {
    type Err = IsingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cubic" | "sc" => Ok(StructureType::Cubic),
            "hexagonal" | "hcp" => Ok(StructureType::Hexagonal),
            "fcc" => Ok(StructureType::Fcc),
            "bcc" => Ok(StructureType::Bcc),
            _ => Err(IsingError::InvalidStructureType(s.to_string())),
        }
    }
}

/// Largest structure `build` accepts
pub const MAX_ATOMS: usize = 1 << 24;

/// Grid extent along x, y and z (number of unit cells, or of columns, rows
/// and layers for the hexagonal lattice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Dimensions {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Number of cells, `None` if `x * y * z` overflows
    pub fn cell_count(&self) -> Option<usize> {
        self.x.checked_mul(self.y)?.checked_mul(self.z)
    }

    pub fn validate(&self) -> Result<()> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(IsingError::InvalidDimension(format!(
                "grid size must be at least 1 along every axis, got {}x{}x{}",
                self.x, self.y, self.z
            )));
        }
        if self.cell_count().is_none() {
            return Err(IsingError::InvalidDimension(format!(
                "grid size {}x{}x{} overflows the cell count",
                self.x, self.y, self.z
            )));
        }
        Ok(())
    }
}

impl From<[usize; 3]> for Dimensions {
    fn from(size: [usize; 3]) -> Self {
        Dimensions::new(size[0], size[1], size[2])
    }
}

/// Everything that determines the topology of a structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeGeometry {
    pub structure_type: StructureType,
    pub dimensions: Dimensions,
    pub spacing: f64,
}

impl LatticeGeometry {
    pub fn new(structure_type: StructureType, dimensions: Dimensions, spacing: f64) -> Self {
        Self {
            structure_type,
            dimensions,
            spacing,
        }
    }

    /// Upper bound on the number of atoms in the structure, counted before
    /// de-duplication
    pub fn atom_capacity(&self) -> Option<usize> {
        self.dimensions
            .cell_count()?
            .checked_mul(self.structure_type.atoms_per_cell())
    }

    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(IsingError::InvalidDimension(format!(
                "spacing must be a positive finite number, got {}",
                self.spacing
            )));
        }

        let Dimensions { x, y, z } = self.dimensions;
        let longest = x.max(y).max(z) as f64 + 1.0;
        if !(self.spacing * longest).is_finite() {
            return Err(IsingError::InvalidDimension(format!(
                "lattice extent {} * {} is not finite",
                self.spacing, longest
            )));
        }

        match self.atom_capacity() {
            Some(atoms) if atoms <= MAX_ATOMS => Ok(()),
            _ => Err(IsingError::InvalidDimension(format!(
                "{} {}x{}x{} exceeds the limit of {} atoms",
                self.structure_type, x, y, z, MAX_ATOMS
            ))),
        }
    }

    pub fn build(&self) -> Result<Structure> {
        build(
            self.structure_type,
            self.dimensions.x,
            self.dimensions.y,
            self.dimensions.z,
            self.spacing,
        )
    }
}

/// Owned collection of atoms together with the parameters it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    geometry: LatticeGeometry,
    atoms: Vec<Atom>,
}

impl Structure {
    pub(crate) fn new(geometry: LatticeGeometry, atoms: Vec<Atom>) -> Self {
        Self { geometry, atoms }
    }

    pub fn geometry(&self) -> &LatticeGeometry {
        &self.geometry
    }

    pub fn structure_type(&self) -> StructureType {
        self.geometry.structure_type
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn spins(&self) -> impl Iterator<Item = Spin> + '_ {
        self.atoms.iter().map(|atom| atom.spin)
    }

    /// Index of the atom whose position lies within `tolerance` of `position`
    pub fn find_atom(&self, position: &Vector3<f64>, tolerance: f64) -> Option<usize> {
        self.atoms
            .iter()
            .position(|atom| (atom.position - position).norm() < tolerance)
    }

    /// Every undirected bond exactly once, as `(i, j)` with `j > i`
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.atoms.iter().enumerate().flat_map(|(i, atom)| {
            atom.neighbors
                .iter()
                .copied()
                .filter(move |&j| j > i)
                .map(move |j| (i, j))
        })
    }

    pub fn bond_count(&self) -> usize {
        self.bonds().count()
    }

    /// Map from neighbor count to the number of atoms having it
    pub fn degree_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for atom in &self.atoms {
            *histogram.entry(atom.degree()).or_insert(0) += 1;
        }
        histogram
    }

    /// Assign every spin independently, up or down with probability 1/2
    pub fn init_random_spins<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for atom in &mut self.atoms {
            atom.spin = Spin::random(rng);
        }
    }

    /// Set every spin to the same orientation
    pub fn align_spins(&mut self, spin: Spin) {
        for atom in &mut self.atoms {
            atom.spin = spin;
        }
    }

    pub(crate) fn set_spin(&mut self, index: usize, spin: Spin) {
        self.atoms[index].spin = spin;
    }

    pub(crate) fn set_energy(&mut self, index: usize, energy: f64) {
        self.atoms[index].energy = energy;
    }
}

impl<'a> IntoIterator for &'a Structure {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

/// Build a fresh structure of the requested type.
///
/// Spins start out all up and energies at zero; callers initialise spins and
/// refresh energies before simulating.
pub fn build(
    structure_type: StructureType,
    x: usize,
    y: usize,
    z: usize,
    distance: f64,
) -> Result<Structure> {
    let geometry = LatticeGeometry::new(structure_type, Dimensions::new(x, y, z), distance);
    geometry.validate()?;

    let atoms = match structure_type {
        StructureType::Cubic => cubic::build(x, y, z, distance),
        StructureType::Hexagonal => hexagonal::build(x, y, z, distance),
        StructureType::Fcc => fcc::build(x, y, z, distance),
        StructureType::Bcc => bcc::build(x, y, z, distance),
    };

    let structure = Structure::new(geometry, atoms);
    debug!(
        "Built {} lattice {}x{}x{} (a = {}): {} atoms, {} bonds",
        structure_type,
        x,
        y,
        z,
        distance,
        structure.len(),
        structure.bond_count()
    );
    Ok(structure)
}

/// Attach neighbor lists computed elsewhere to freshly placed atoms
pub(crate) fn atoms_with_neighbors(
    positions: Vec<Vector3<f64>>,
    neighbors: Vec<Vec<usize>>,
) -> Vec<Atom> {
    positions
        .into_iter()
        .zip(neighbors)
        .map(|(position, neighbors)| Atom {
            neighbors,
            ..Atom::new(position)
        })
        .collect()
}

#[cfg(test)]
mod tests;
