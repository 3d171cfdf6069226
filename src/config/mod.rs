//! Configuration management for lattice simulations
//!
//! This module handles the YAML run configuration, its defaults, command-line
//! overrides and validation.

mod args;

pub use args::Args;

use crate::energy::EnergyRefresh;
use crate::error::{IsingError, Result as IsingResult};
use crate::lattice::{Dimensions, LatticeGeometry, StructureType};
use crate::parameters::SimulationParameters;
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for a simulation run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub lattice: LatticeParams,
    #[serde(default)]
    pub parameters: ModelParams,
    #[serde(default)]
    pub run: RunParams,
}

/// Lattice topology
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LatticeParams {
    pub structure: Option<StructureType>,
    pub size: Option<[usize; 3]>,
    pub spacing: Option<f64>,
}

impl Default for LatticeParams {
    fn default() -> Self {
        LatticeParams {
            structure: Some(StructureType::Cubic),
            size: Some([10, 10, 10]),
            spacing: Some(2.0),
        }
    }
}

/// Physical model parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelParams {
    pub temperature: Option<f64>,
    pub coupling: Option<f64>,
    pub field: Option<f64>,
    pub steps_per_tick: Option<usize>,
}

impl Default for ModelParams {
    fn default() -> Self {
        let defaults = SimulationParameters::default();
        ModelParams {
            temperature: Some(defaults.temperature),
            coupling: Some(defaults.coupling),
            field: Some(defaults.field),
            steps_per_tick: Some(defaults.steps_per_tick),
        }
    }
}

/// Initial spin configuration after a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialSpins {
    #[default]
    Random,
    Up,
    Down,
}

/// Run control
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunParams {
    pub ticks: Option<u64>,
    pub report_interval: Option<u64>,
    pub seed: Option<u64>,
    pub energy_refresh: Option<EnergyRefresh>,
    pub initial_spins: Option<InitialSpins>,
    pub snapshot: Option<String>,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            ticks: Some(1000),
            report_interval: Some(100),
            seed: None,
            energy_refresh: Some(EnergyRefresh::default()),
            initial_spins: Some(InitialSpins::default()),
            snapshot: None,
        }
    }
}

impl LatticeParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.structure.is_none() {
            self.structure = defaults.structure;
        }
        if self.size.is_none() {
            self.size = defaults.size;
        }
        if self.spacing.is_none() {
            self.spacing = defaults.spacing;
        }
        self
    }
}

impl ModelParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.temperature.is_none() {
            self.temperature = defaults.temperature;
        }
        if self.coupling.is_none() {
            self.coupling = defaults.coupling;
        }
        if self.field.is_none() {
            self.field = defaults.field;
        }
        if self.steps_per_tick.is_none() {
            self.steps_per_tick = defaults.steps_per_tick;
        }
        self
    }
}

impl RunParams {
    /// Apply default values to any missing parameters; `seed` and `snapshot`
    /// stay unset unless given
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.ticks.is_none() {
            self.ticks = defaults.ticks;
        }
        if self.report_interval.is_none() {
            self.report_interval = defaults.report_interval;
        }
        if self.energy_refresh.is_none() {
            self.energy_refresh = defaults.energy_refresh;
        }
        if self.initial_spins.is_none() {
            self.initial_spins = defaults.initial_spins;
        }
        self
    }
}

impl Config {
    /// Load a configuration file and fill in defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).wrap_err_with(|| {
            format!("Unable to read configuration file: {}", path.display())
        })?;
        let config = serde_yml::from_str::<Config>(&content)
            .wrap_err("Failed to parse configuration file")?
            .with_defaults();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self).wrap_err("Failed to serialize configuration")?;
        fs::write(path.as_ref(), content).wrap_err_with(|| {
            format!("Unable to write configuration file: {}", path.as_ref().display())
        })?;
        Ok(())
    }

    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.lattice = self.lattice.with_defaults();
        self.parameters = self.parameters.with_defaults();
        self.run = self.run.with_defaults();
        self
    }

    /// Command-line values take precedence over the file
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(structure) = args.structure {
            self.lattice.structure = Some(structure);
        }
        if let Some(&[x, y, z]) = args.size.as_deref() {
            self.lattice.size = Some([x, y, z]);
        }
        if args.spacing.is_some() {
            self.lattice.spacing = args.spacing;
        }
        if args.temperature.is_some() {
            self.parameters.temperature = args.temperature;
        }
        if args.coupling.is_some() {
            self.parameters.coupling = args.coupling;
        }
        if args.field.is_some() {
            self.parameters.field = args.field;
        }
        if args.steps_per_tick.is_some() {
            self.parameters.steps_per_tick = args.steps_per_tick;
        }
        if args.ticks.is_some() {
            self.run.ticks = args.ticks;
        }
        if args.report_interval.is_some() {
            self.run.report_interval = args.report_interval;
        }
        if args.seed.is_some() {
            self.run.seed = args.seed;
        }
        if args.snapshot.is_some() {
            self.run.snapshot = args.snapshot.clone();
        }
    }

    pub fn geometry(&self) -> LatticeGeometry {
        let lattice = self.lattice.clone().with_defaults();
        let [x, y, z] = lattice.size.unwrap_or([10, 10, 10]);
        LatticeGeometry::new(
            lattice.structure.unwrap_or(StructureType::Cubic),
            Dimensions::new(x, y, z),
            lattice.spacing.unwrap_or(2.0),
        )
    }

    pub fn simulation_parameters(&self) -> SimulationParameters {
        let defaults = SimulationParameters::default();
        let model = &self.parameters;
        SimulationParameters {
            temperature: model.temperature.unwrap_or(defaults.temperature),
            coupling: model.coupling.unwrap_or(defaults.coupling),
            field: model.field.unwrap_or(defaults.field),
            steps_per_tick: model.steps_per_tick.unwrap_or(defaults.steps_per_tick),
            energy_refresh: self.run.energy_refresh.unwrap_or_default(),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.run.ticks.unwrap_or(1000)
    }

    pub fn report_interval(&self) -> u64 {
        self.run.report_interval.unwrap_or(100)
    }

    pub fn initial_spins(&self) -> InitialSpins {
        self.run.initial_spins.unwrap_or_default()
    }

    /// Validate lattice, model and run parameters
    pub fn validate(&self) -> IsingResult<()> {
        self.geometry().validate()?;
        self.simulation_parameters().validate()?;
        if self.report_interval() == 0 {
            return Err(IsingError::InvalidParameter(
                "report interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
