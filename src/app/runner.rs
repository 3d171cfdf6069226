use super::report::report_observables;
use crate::monte_carlo::TickSummary;
use crate::observables::{magnetic_susceptibility, mean, specific_heat};
use crate::simulation::{Simulation, SimulationState};
use color_eyre::eyre::{Result, WrapErr};
use rand::Rng;

/// Per-tick samples gathered while the simulation runs
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    sites: usize,
    energies: Vec<f64>,
    /// Total magnetization Σ s_i per tick
    magnetizations: Vec<f64>,
    attempted: usize,
    accepted: usize,
}

impl RunStatistics {
    pub fn new(sites: usize) -> Self {
        RunStatistics {
            sites,
            ..Default::default()
        }
    }

    /// Record one completed tick; `magnetization` is per site
    pub fn record(&mut self, summary: &TickSummary, total_energy: f64, magnetization: f64) {
        self.attempted += summary.attempted;
        self.accepted += summary.accepted;
        self.energies.push(total_energy);
        self.magnetizations.push(magnetization * self.sites as f64);
    }

    pub fn ticks(&self) -> usize {
        self.energies.len()
    }

    pub fn sites(&self) -> usize {
        self.sites
    }

    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempted as f64
    }

    pub fn mean_energy(&self) -> f64 {
        mean(&self.energies)
    }

    /// Mean absolute magnetization per site
    pub fn mean_abs_magnetization(&self) -> f64 {
        if self.sites == 0 {
            return 0.0;
        }
        let absolute: Vec<f64> = self.magnetizations.iter().map(|m| m.abs()).collect();
        mean(&absolute) / self.sites as f64
    }

    pub fn specific_heat(&self, temperature: f64) -> f64 {
        specific_heat(&self.energies, temperature, self.sites)
    }

    pub fn susceptibility(&self, temperature: f64) -> f64 {
        magnetic_susceptibility(&self.magnetizations, temperature, self.sites)
    }
}

/// Drive `simulation` in the running state for `ticks` ticks, logging the
/// observables every `report_interval` ticks
pub fn run_ticks<R: Rng>(
    simulation: &mut Simulation<R>,
    ticks: u64,
    report_interval: u64,
) -> Result<RunStatistics> {
    let mut stats = RunStatistics::new(simulation.structure().len());
    simulation.set_state(SimulationState::Running);

    for _ in 0..ticks {
        let Some(report) = simulation.advance().wrap_err("Monte Carlo tick failed")? else {
            break;
        };
        let observed = simulation.observables();
        stats.record(&report.summary, report.total_energy, observed.magnetization);
        if report_interval > 0 && report.tick % report_interval == 0 {
            report_observables(report.tick, &observed);
        }
    }

    simulation.set_state(SimulationState::Paused);
    Ok(stats)
}
