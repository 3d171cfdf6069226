//! Ising energy model
//!
//! The local energy of site i is
//!
//! E_i = -J * s_i * Σ_{j ∈ N(i)} s_j - B * s_i
//!
//! and the structure energy is Σ E_i / 2, halving the bond terms that are
//! counted from both ends.

use crate::lattice::{Spin, Structure};
use serde::{Deserialize, Serialize};

/// How cached energies are brought up to date after an accepted flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyRefresh {
    /// Recompute every atom, O(n) per accepted flip
    Global,
    /// Recompute only the flipped atom and its neighbors
    #[default]
    Local,
}

/// Sum of the neighbor spins of atom `index`
pub fn neighbor_field(structure: &Structure, index: usize) -> f64 {
    let atoms = structure.atoms();
    atoms[index]
        .neighbors()
        .iter()
        .map(|&j| atoms[j].spin().as_f64())
        .sum()
}

/// Local energy atom `index` would have with the given spin, all other spins
/// unchanged
pub fn local_energy_with_spin(
    structure: &Structure,
    index: usize,
    spin: Spin,
    coupling: f64,
    field: f64,
) -> f64 {
    let s = spin.as_f64();
    -coupling * s * neighbor_field(structure, index) - field * s
}

/// Local energy of atom `index` under its current spin
pub fn local_energy(structure: &Structure, index: usize, coupling: f64, field: f64) -> f64 {
    let spin = structure.atoms()[index].spin();
    local_energy_with_spin(structure, index, spin, coupling, field)
}

/// Recompute the cached energy of every atom
pub fn update_energies(structure: &mut Structure, coupling: f64, field: f64) {
    for index in 0..structure.len() {
        let energy = local_energy(structure, index, coupling, field);
        structure.set_energy(index, energy);
    }
}

/// Recompute the cached energy of atom `index` and of its neighbors, the only
/// local terms that change when that atom flips
pub fn refresh_around(structure: &mut Structure, index: usize, coupling: f64, field: f64) {
    let energy = local_energy(structure, index, coupling, field);
    structure.set_energy(index, energy);

    for k in 0..structure.atoms()[index].degree() {
        let j = structure.atoms()[index].neighbors()[k];
        let energy = local_energy(structure, j, coupling, field);
        structure.set_energy(j, energy);
    }
}

/// Bring cached energies up to date after atom `index` flipped
pub fn refresh_after_flip(
    structure: &mut Structure,
    index: usize,
    coupling: f64,
    field: f64,
    policy: EnergyRefresh,
) {
    match policy {
        EnergyRefresh::Global => update_energies(structure, coupling, field),
        EnergyRefresh::Local => refresh_around(structure, index, coupling, field),
    }
}

/// Total energy from the cached per-atom energies, halved for double counting
pub fn total_energy(structure: &Structure) -> f64 {
    structure.iter().map(|atom| atom.energy()).sum::<f64>() / 2.0
}

/// Energy per atom, zero for an empty structure
pub fn energy_per_site(structure: &Structure) -> f64 {
    if structure.is_empty() {
        return 0.0;
    }
    total_energy(structure) / structure.len() as f64
}

/// Ising Hamiltonian evaluated directly from spins, counting each bond once:
///
/// H = -J Σ_{<ij>} s_i s_j - B Σ_i s_i
///
/// With B = 0 this equals [`total_energy`]. Otherwise the halved local sum
/// carries only half of the field term, so
/// `total_energy = hamiltonian + B/2 * Σ s_i`.
pub fn hamiltonian(structure: &Structure, coupling: f64, field: f64) -> f64 {
    let atoms = structure.atoms();
    let bond_sum: f64 = structure
        .bonds()
        .map(|(i, j)| atoms[i].spin().as_f64() * atoms[j].spin().as_f64())
        .sum();
    let spin_sum: f64 = atoms.iter().map(|atom| atom.spin().as_f64()).sum();
    -coupling * bond_sum - field * spin_sum
}
