//! Three-dimensional Ising model on cubic, hexagonal close-packed,
//! face-centered and body-centered cubic lattices, driven by single-spin-flip
//! Metropolis Monte Carlo.

pub mod app;
pub mod config;
pub mod energy;
pub mod error;
pub mod io;
pub mod lattice;
pub mod monte_carlo;
pub mod observables;
pub mod parameters;
pub mod simulation;

pub use energy::{hamiltonian, total_energy, update_energies, EnergyRefresh};
pub use error::{IsingError, Result};
pub use lattice::{build, Atom, Dimensions, LatticeGeometry, Spin, Structure, StructureType};
pub use monte_carlo::{monte_carlo_step, run_tick, FlipAttempt, TickSummary};
pub use observables::Observables;
pub use parameters::SimulationParameters;
pub use simulation::{Simulation, SimulationState, TickReport};
