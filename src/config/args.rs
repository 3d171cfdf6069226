//! Command-line argument parsing for lattice simulations

use crate::lattice::StructureType;
use clap::Parser;

/// 3D Ising model Monte Carlo on cubic, hexagonal, FCC and BCC lattices
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override crystal structure
    #[arg(long, value_enum)]
    pub structure: Option<StructureType>,

    /// Override grid size along x, y and z
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub size: Option<Vec<usize>>,

    /// Override lattice spacing
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Override temperature (units of J/k_B)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Override coupling constant J
    #[arg(long, allow_negative_numbers = true)]
    pub coupling: Option<f64>,

    /// Override external field B
    #[arg(long, allow_negative_numbers = true)]
    pub field: Option<f64>,

    /// Override single-spin updates per tick
    #[arg(long)]
    pub steps_per_tick: Option<usize>,

    /// Override number of ticks to run
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Override progress report interval (ticks)
    #[arg(long)]
    pub report_interval: Option<u64>,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log file (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the final structure to this file
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Log per-tick details
    #[arg(short, long)]
    pub verbose: bool,
}
