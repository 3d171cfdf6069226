use crate::energy::EnergyRefresh;
use crate::error::{IsingError, Result};
use serde::{Deserialize, Serialize};

/// Physical and numerical knobs of the Monte Carlo engine.
///
/// Read-only to the engine for the duration of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Temperature in units of J/k_B, zero allowed
    pub temperature: f64,
    /// Coupling constant J; positive favors aligned neighbors
    pub coupling: f64,
    /// External field B
    pub field: f64,
    /// Single-spin updates per tick
    pub steps_per_tick: usize,
    /// How cached energies are refreshed after an accepted flip
    #[serde(default)]
    pub energy_refresh: EnergyRefresh,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            temperature: 2.5,
            coupling: 1.0,
            field: 0.1,
            steps_per_tick: 100,
            energy_refresh: EnergyRefresh::default(),
        }
    }
}

impl SimulationParameters {
    pub fn new(temperature: f64, coupling: f64, field: f64, steps_per_tick: usize) -> Self {
        SimulationParameters {
            temperature,
            coupling,
            field,
            steps_per_tick,
            energy_refresh: EnergyRefresh::default(),
        }
    }

    pub fn with_energy_refresh(mut self, energy_refresh: EnergyRefresh) -> Self {
        self.energy_refresh = energy_refresh;
        self
    }

    /// Check every field, including the tick batch size
    pub fn validate(&self) -> Result<()> {
        self.validate_physics()?;
        if self.steps_per_tick == 0 {
            return Err(IsingError::InvalidParameter(
                "steps per tick must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check only the fields a single flip reads: temperature, coupling and
    /// field
    pub fn validate_physics(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(IsingError::InvalidParameter(format!(
                "temperature must be finite and non-negative, got {}",
                self.temperature
            )));
        }
        if !self.coupling.is_finite() {
            return Err(IsingError::InvalidParameter(format!(
                "coupling must be finite, got {}",
                self.coupling
            )));
        }
        if !self.field.is_finite() {
            return Err(IsingError::InvalidParameter(format!(
                "field must be finite, got {}",
                self.field
            )));
        }
        Ok(())
    }

    /// Whether switching from `self` to `other` invalidates cached energies
    pub fn changes_energies(&self, other: &SimulationParameters) -> bool {
        self.coupling != other.coupling || self.field != other.field
    }
}
