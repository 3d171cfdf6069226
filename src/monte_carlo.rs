//! Single-spin-flip Metropolis dynamics

use crate::energy::{neighbor_field, refresh_after_flip};
use crate::error::{IsingError, Result};
use crate::lattice::Structure;
use crate::parameters::SimulationParameters;
use rand::Rng;

/// Outcome of one flip attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipAttempt {
    /// Index of the atom that was proposed for a flip
    pub index: usize,
    /// E(flipped) - E(current) of the chosen atom
    pub delta_energy: f64,
    pub accepted: bool,
}

/// Aggregate of the flip attempts of one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickSummary {
    pub attempted: usize,
    pub accepted: usize,
    /// Sum of ΔE over accepted flips
    pub energy_change: f64,
}

impl TickSummary {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempted as f64
    }

    fn record(&mut self, attempt: &FlipAttempt) {
        self.attempted += 1;
        if attempt.accepted {
            self.accepted += 1;
            self.energy_change += attempt.delta_energy;
        }
    }
}

/// Metropolis criterion.
///
/// Downhill moves are always taken without consuming randomness. Uphill or
/// neutral moves are taken with probability exp(-ΔE / T), and never at T = 0.
pub fn metropolis_accept<R: Rng + ?Sized>(
    delta_energy: f64,
    temperature: f64,
    rng: &mut R,
) -> bool {
    if delta_energy < 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (-delta_energy / temperature).exp()
}

/// Propose flipping one uniformly chosen atom and apply the Metropolis rule.
///
/// On acceptance the spin changes in place and cached energies are refreshed
/// according to `params.energy_refresh`. `steps_per_tick` is not read here.
///
/// ΔE comes from the spins, but the cache is only patched around the flipped
/// atom under [`EnergyRefresh::Local`](crate::energy::EnergyRefresh), so the
/// cached energies must be current beforehand (call
/// [`update_energies`](crate::energy::update_energies) after `build`) for
/// [`total_energy`](crate::energy::total_energy) to stay correct.
pub fn monte_carlo_step<R: Rng + ?Sized>(
    structure: &mut Structure,
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<FlipAttempt> {
    params.validate_physics()?;
    if structure.is_empty() {
        return Err(IsingError::EmptyStructure);
    }
    Ok(attempt_flip(structure, params, rng))
}

/// Run `params.steps_per_tick` flip attempts as one batch. Same cache
/// precondition as [`monte_carlo_step`].
pub fn run_tick<R: Rng + ?Sized>(
    structure: &mut Structure,
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<TickSummary> {
    params.validate()?;
    if structure.is_empty() {
        return Err(IsingError::EmptyStructure);
    }

    let mut summary = TickSummary::default();
    for _ in 0..params.steps_per_tick {
        let attempt = attempt_flip(structure, params, rng);
        summary.record(&attempt);
    }
    Ok(summary)
}

fn attempt_flip<R: Rng + ?Sized>(
    structure: &mut Structure,
    params: &SimulationParameters,
    rng: &mut R,
) -> FlipAttempt {
    let index = rng.gen_range(0..structure.len());
    let current = structure.atoms()[index].spin();
    let flipped = current.flipped();

    let neighbor_sum = neighbor_field(structure, index);
    let energy_of = |s: f64| -params.coupling * s * neighbor_sum - params.field * s;
    let delta_energy = energy_of(flipped.as_f64()) - energy_of(current.as_f64());

    let accepted = metropolis_accept(delta_energy, params.temperature, rng);
    if accepted {
        structure.set_spin(index, flipped);
        refresh_after_flip(
            structure,
            index,
            params.coupling,
            params.field,
            params.energy_refresh,
        );
    }

    FlipAttempt {
        index,
        delta_energy,
        accepted,
    }
}

#[cfg(test)]
mod tests;
