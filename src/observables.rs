//! Measurements on a structure: spin statistics, energy normalisation for
//! colour mapping, and fluctuation estimators over sampled series

use crate::energy::{energy_per_site, total_energy};
use crate::lattice::{Atom, Spin, Structure};
use serde::Serialize;

/// Number of up and down spins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpinCounts {
    pub up: usize,
    pub down: usize,
}

impl SpinCounts {
    pub fn total(&self) -> usize {
        self.up + self.down
    }

    /// Σ s_i
    pub fn net(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}

pub fn spin_counts(structure: &Structure) -> SpinCounts {
    let up = structure.spins().filter(|&s| s == Spin::Up).count();
    SpinCounts {
        up,
        down: structure.len() - up,
    }
}

/// Magnetization per site, (up - down) / n; zero for an empty structure
pub fn magnetization(structure: &Structure) -> f64 {
    let counts = spin_counts(structure);
    if counts.total() == 0 {
        return 0.0;
    }
    counts.net() as f64 / counts.total() as f64
}

/// Statistics shown alongside a rendered structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observables {
    pub atoms: usize,
    pub bonds: usize,
    pub spins: SpinCounts,
    pub total_energy: f64,
    pub energy_per_site: f64,
    pub magnetization: f64,
}

impl Observables {
    pub fn measure(structure: &Structure) -> Self {
        Observables {
            atoms: structure.len(),
            bonds: structure.bond_count(),
            spins: spin_counts(structure),
            total_energy: total_energy(structure),
            energy_per_site: energy_per_site(structure),
            magnetization: magnetization(structure),
        }
    }
}

/// Map the cached energy of `atom` into [0, 1] for colour mapping.
///
/// The bounds are ±(|J| * degree + |B|), the extremes a site of that degree
/// can reach. An isolated site in zero field has a zero range and maps to 0.5.
pub fn normalized_energy(atom: &Atom, coupling: f64, field: f64) -> f64 {
    let bound = coupling.abs() * atom.degree() as f64 + field.abs();
    let range = 2.0 * bound;
    if range <= f64::EPSILON {
        return 0.5;
    }
    ((atom.energy() + bound) / range).clamp(0.0, 1.0)
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

pub fn variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mean = mean(samples);
    let mean_squared = samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64;
    (mean_squared - mean * mean).max(0.0)
}

/// Specific heat per site from total-energy samples, C = Var(E) / (T² N)
pub fn specific_heat(energy_samples: &[f64], temperature: f64, sites: usize) -> f64 {
    if energy_samples.len() < 2 || temperature <= 0.0 || sites == 0 {
        return 0.0;
    }
    variance(energy_samples) / (temperature * temperature * sites as f64)
}

/// Susceptibility per site from total-magnetization samples, χ = Var(M) / (T N)
pub fn magnetic_susceptibility(
    magnetization_samples: &[f64],
    temperature: f64,
    sites: usize,
) -> f64 {
    if magnetization_samples.len() < 2 || temperature <= 0.0 || sites == 0 {
        return 0.0;
    }
    variance(magnetization_samples) / (temperature * sites as f64)
}
