mod report;
mod runner;

pub use runner::{run_ticks, RunStatistics};

use self::report::{report_setup, report_summary};
use crate::config::{Args, Config, InitialSpins};
use crate::io::{save_snapshot, setup_output};
use crate::lattice::Spin;
use crate::simulation::Simulation;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

pub struct IsingApplication {
    args: Args,
    config: Config,
}

impl IsingApplication {
    pub fn from_cli() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref(), self.args.verbose)?;
        match &self.args.config_file {
            Some(path) => info!("Configuration loaded from: {}", path),
            None => info!("Using built-in configuration"),
        }

        let stats = self.simulate()?;
        info!("Acceptance over the whole run: {:.4}", stats.acceptance_ratio());
        Ok(())
    }

    /// Build the lattice, run the configured number of ticks and write the
    /// final snapshot if one was requested
    pub fn simulate(&self) -> Result<RunStatistics> {
        let params = self.config.simulation_parameters();
        let mut simulation =
            Simulation::with_seed(self.config.geometry(), params, self.config.run.seed)
                .wrap_err("Failed to set up simulation")?;

        match self.config.initial_spins() {
            InitialSpins::Random => {}
            InitialSpins::Up => simulation.align_spins(Spin::Up),
            InitialSpins::Down => simulation.align_spins(Spin::Down),
        }
        report_setup(simulation.structure(), simulation.parameters());

        let stats = run_ticks(
            &mut simulation,
            self.config.ticks(),
            self.config.report_interval(),
        )?;
        report_summary(&stats, simulation.parameters());

        if let Some(path) = &self.config.run.snapshot {
            save_snapshot(path, simulation.structure())?;
        }
        Ok(stats)
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default().with_defaults(),
    };
    config.apply_overrides(args);
    config.validate().wrap_err("Invalid configuration")?;
    Ok(config)
}
