//! Simulation orchestrator
//!
//! [`Simulation`] owns the current structure, the tunable parameters and the
//! run state. A driving loop calls [`Simulation::advance`] once per frame (or
//! per logical timestep); between calls the structure is a stable snapshot
//! that a renderer can read.

use crate::energy::{total_energy, update_energies};
use crate::error::Result;
use crate::lattice::{Dimensions, LatticeGeometry, Spin, Structure, StructureType};
use crate::monte_carlo::{run_tick, TickSummary};
use crate::observables::Observables;
use crate::parameters::SimulationParameters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Run mode of the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    #[default]
    Paused,
    Running,
    /// Run exactly one tick, then fall back to `Paused`
    Step,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationState::Paused => "paused",
            SimulationState::Running => "running",
            SimulationState::Step => "step",
        };
        f.write_str(name)
    }
}

/// Result of one completed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Number of ticks completed since the last rebuild, including this one
    pub tick: u64,
    pub summary: TickSummary,
    pub total_energy: f64,
}

/// Owner of the structure and driver of the Monte Carlo engine
#[derive(Debug, Clone)]
pub struct Simulation<R: Rng = StdRng> {
    geometry: LatticeGeometry,
    params: SimulationParameters,
    state: SimulationState,
    needs_rebuild: bool,
    structure: Structure,
    rng: R,
    tick: u64,
}

impl Simulation<StdRng> {
    /// Simulation seeded from the given value, or from OS entropy when `None`
    pub fn with_seed(
        geometry: LatticeGeometry,
        params: SimulationParameters,
        seed: Option<u64>,
    ) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Simulation::new(geometry, params, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build the initial structure with random spins and fresh energies
    pub fn new(geometry: LatticeGeometry, params: SimulationParameters, rng: R) -> Result<Self> {
        params.validate()?;
        let structure = geometry.build()?;

        let mut simulation = Simulation {
            geometry,
            params,
            state: SimulationState::Paused,
            needs_rebuild: false,
            structure,
            rng,
            tick: 0,
        };
        simulation.reinitialize();
        Ok(simulation)
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Owned copy of the current structure for a consumer that outlives the
    /// next tick
    pub fn snapshot(&self) -> Structure {
        self.structure.clone()
    }

    pub fn geometry(&self) -> &LatticeGeometry {
        &self.geometry
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn total_energy(&self) -> f64 {
        total_energy(&self.structure)
    }

    pub fn observables(&self) -> Observables {
        Observables::measure(&self.structure)
    }

    pub fn set_state(&mut self, state: SimulationState) {
        if state != self.state {
            info!("Simulation state: {} -> {}", self.state, state);
        }
        self.state = state;
    }

    /// Replace the tunable parameters. Takes effect on the next tick; cached
    /// energies are recomputed right away when J or B changed.
    pub fn set_parameters(&mut self, params: SimulationParameters) -> Result<()> {
        if let Err(err) = params.validate() {
            warn!("Rejected parameter change: {}", err);
            return Err(err);
        }
        let refresh = self.params.changes_energies(&params);
        self.params = params;
        if refresh && !self.needs_rebuild {
            update_energies(&mut self.structure, params.coupling, params.field);
        }
        Ok(())
    }

    /// Request a new topology. The old structure is discarded on the next
    /// [`advance`](Self::advance) or [`rebuild`](Self::rebuild).
    pub fn set_geometry(&mut self, geometry: LatticeGeometry) -> Result<()> {
        if let Err(err) = geometry.validate() {
            warn!("Rejected geometry change: {}", err);
            return Err(err);
        }
        if geometry != self.geometry {
            self.geometry = geometry;
            self.needs_rebuild = true;
        }
        Ok(())
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<()> {
        self.set_geometry(LatticeGeometry {
            dimensions,
            ..self.geometry
        })
    }

    pub fn set_spacing(&mut self, spacing: f64) -> Result<()> {
        self.set_geometry(LatticeGeometry {
            spacing,
            ..self.geometry
        })
    }

    pub fn set_structure_type(&mut self, structure_type: StructureType) -> Result<()> {
        self.set_geometry(LatticeGeometry {
            structure_type,
            ..self.geometry
        })
    }

    /// Discard the current structure and build a fresh one from the current
    /// geometry, with random spins and recomputed energies
    pub fn rebuild(&mut self) -> Result<()> {
        let structure = self.geometry.build()?;
        info!(
            "Rebuilt {} lattice {}x{}x{} (spacing {}): {} atoms",
            self.geometry.structure_type,
            self.geometry.dimensions.x,
            self.geometry.dimensions.y,
            self.geometry.dimensions.z,
            self.geometry.spacing,
            structure.len()
        );
        self.structure = structure;
        self.needs_rebuild = false;
        self.tick = 0;
        self.reinitialize();
        Ok(())
    }

    /// Randomise every spin and recompute energies, keeping the topology
    pub fn reinitialize(&mut self) {
        self.structure.init_random_spins(&mut self.rng);
        update_energies(&mut self.structure, self.params.coupling, self.params.field);
    }

    /// Set every spin to one orientation and recompute energies
    pub fn align_spins(&mut self, spin: Spin) {
        self.structure.align_spins(spin);
        update_energies(&mut self.structure, self.params.coupling, self.params.field);
    }

    /// Handle a pending rebuild, then run one tick if the state asks for it.
    ///
    /// Returns `None` when paused. A `Step` state runs one tick and reverts
    /// to `Paused`.
    pub fn advance(&mut self) -> Result<Option<TickReport>> {
        if self.needs_rebuild {
            self.rebuild()?;
        }

        match self.state {
            SimulationState::Paused => Ok(None),
            SimulationState::Running => self.tick_once().map(Some),
            SimulationState::Step => {
                let report = self.tick_once()?;
                self.set_state(SimulationState::Paused);
                Ok(Some(report))
            }
        }
    }

    fn tick_once(&mut self) -> Result<TickReport> {
        let summary = run_tick(&mut self.structure, &self.params, &mut self.rng)?;
        self.tick += 1;
        let report = TickReport {
            tick: self.tick,
            summary,
            total_energy: total_energy(&self.structure),
        };
        debug!(
            "Tick {}: {}/{} flips accepted, E = {:.4}",
            report.tick, summary.accepted, summary.attempted, report.total_energy
        );
        Ok(report)
    }
}
